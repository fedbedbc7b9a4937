//! Tests for the `jgen` commands.

use clap::Parser;
use journalgen::cmd::{self, Cli, Status};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"[
  {
    "code": "P001",
    "name": "Cash sale",
    "source_table_name": "sales",
    "lines": [
      { "line_number": 1, "side": "debit", "account_code": "1100", "amount_formula": "amount", "description_template": "Sale {ref}" },
      { "line_number": 2, "side": "credit", "account_code": "4100", "amount_formula": "amount", "description_template": "Sale {ref}" }
    ]
  },
  {
    "code": "P002",
    "name": "Short credit",
    "lines": [
      { "line_number": 1, "side": "Debit", "account_code": "1100", "amount_formula": "amount" },
      { "line_number": 2, "side": "Credit", "account_code": "4100", "amount_formula": "amount * 0.9" }
    ]
  },
  {
    "code": "P003",
    "name": "Retired",
    "is_active": false,
    "lines": [
      { "line_number": 1, "side": "debit", "account_code": "6100", "amount_formula": "fee" },
      { "line_number": 2, "side": "credit", "account_code": "1100", "amount_formula": "fee" }
    ]
  }
]"#;

const BROKEN_CATALOG: &str = r#"[
  {
    "code": "P010",
    "name": "Broken",
    "lines": [
      { "line_number": 1, "side": "debit", "account_code": "1100", "amount_formula": "amount *" },
      { "line_number": 2, "side": "debit", "account_code": "1200", "amount_formula": "amount" }
    ]
  }
]"#;

fn catalog_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run(catalog: &Path, args: &[&str]) -> (Status, String) {
    let mut argv = vec!["jgen", "--catalog", catalog.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let mut out = Vec::new();
    let code = cmd::run(&cli, false, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_list_active() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(catalog.path(), &["list"]);

    assert_eq!(code, Status::Success);
    assert!(out.contains("P001  Cash sale"));
    assert!(out.contains("P002  Short credit"));
    assert!(!out.contains("P003"));
}

#[test]
fn test_list_all_json() {
    let catalog = catalog_file(CATALOG);
    let (_, out) = run(catalog.path(), &["list", "--all", "--format", "json"]);

    let summaries: serde_json::Value = serde_json::from_str(&out).unwrap();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[2]["code"], "P003");
    assert_eq!(summaries[2]["is_active"], false);
}

#[test]
fn test_variables() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(catalog.path(), &["variables", "P001"]);

    assert_eq!(code, Status::Success);
    assert_eq!(out, "amount\n");
}

#[test]
fn test_variables_unknown_pattern() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(catalog.path(), &["variables", "P404"]);

    assert_eq!(code, Status::Failure);
    assert!(out.contains("G4001"));
}

#[test]
fn test_generate_text() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(
        catalog.path(),
        &[
            "generate", "P001", "--var", "amount=1200", "--ctx", "ref=T-77", "--date",
            "2024-01-15",
        ],
    );

    assert_eq!(code, Status::Success);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "2024-01-15 P001");
    assert!(lines[1].contains("1100") && lines[1].contains("1200.00"));
    assert!(lines[1].ends_with("Sale T-77"));
    assert!(lines[2].contains("4100") && lines[2].contains("1200.00"));
}

#[test]
fn test_generate_json_posted() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(
        catalog.path(),
        &[
            "generate", "P001", "--var", "amount=99.5", "--ctx", "ref=X", "--date", "2024-02-29",
            "--post", "-f", "json",
        ],
    );

    assert_eq!(code, Status::Success);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["id"], "JE-000001");
    assert_eq!(json["source_pattern"], "P001");
    assert_eq!(json["journal_date"], "2024-02-29");
    assert_eq!(json["total_debit"], "99.50");
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn test_generate_unbalanced() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(
        catalog.path(),
        &["generate", "P002", "--var", "amount=1000", "--date", "2024-01-15"],
    );

    assert_eq!(code, Status::Failure);
    assert!(out.contains("G3001"));
    assert!(out.contains("difference 100"));
}

#[test]
fn test_generate_input_errors_json() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(
        catalog.path(),
        &["generate", "P001", "--var", "amount=abc", "-f", "json"],
    );

    assert_eq!(code, Status::Failure);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["error_count"], 1);
    assert_eq!(json["diagnostics"][0]["code"], "G1002");
}

#[test]
fn test_generate_override_description() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(
        catalog.path(),
        &[
            "generate",
            "P003",
            "--var",
            "fee=25",
            "--description",
            "Manual fee",
            "--date",
            "2024-03-01",
        ],
    );

    assert_eq!(code, Status::Success);
    assert_eq!(out.matches("Manual fee").count(), 2);
}

#[test]
fn test_check_clean_catalog() {
    let catalog = catalog_file(CATALOG);
    let (code, out) = run(catalog.path(), &["check"]);

    assert_eq!(code, Status::Success);
    assert!(out.contains("No problems found"));
}

#[test]
fn test_check_broken_catalog() {
    let catalog = catalog_file(BROKEN_CATALOG);
    let (code, out) = run(catalog.path(), &["check"]);

    assert_eq!(code, Status::Failure);
    assert!(out.contains("L1007"));
    assert!(out.contains("L1008"));
    assert!(out.contains("2 errors, 0 warnings"));
}

#[test]
fn test_check_json() {
    let catalog = catalog_file(BROKEN_CATALOG);
    let (code, out) = run(catalog.path(), &["check", "--format", "json"]);

    assert_eq!(code, Status::Failure);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["error_count"], 2);
    let codes: Vec<&str> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["L1008", "L1007"]);
}

#[test]
fn test_invalid_catalog_rejected_for_generation() {
    let catalog = catalog_file(BROKEN_CATALOG);
    let cli = Cli::try_parse_from([
        "jgen",
        "--catalog",
        catalog.path().to_str().unwrap(),
        "list",
    ])
    .unwrap();

    let err = cmd::run(&cli, false, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("jgen check"));
}

#[test]
fn test_binary_exit_codes() {
    let catalog = catalog_file(CATALOG);
    let jgen = env!("CARGO_BIN_EXE_jgen");

    let status = Command::new(jgen)
        .args(["--catalog", catalog.path().to_str().unwrap(), "variables", "P001"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));

    let status = Command::new(jgen)
        .args(["--catalog", catalog.path().to_str().unwrap(), "generate", "P002"])
        .args(["--var", "amount=10"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let status = Command::new(jgen)
        .args(["--catalog", "/nonexistent/patterns.json", "list"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));
}
