//! jgen - Generate balanced journal entries from patterns.

fn main() -> std::process::ExitCode {
    journalgen::cmd::main()
}
