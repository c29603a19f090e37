//! `docgen check`, `docgen normalize` and `docgen variables` end to end.

use docgen_cli::test_utils::TemplateFixture;
use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestProject;

#[tokio::test]
async fn test_check_reports_well_formed_and_broken() {
    let project = TestProject::new();
    TemplateFixture::invoice().write_to(project.path()).unwrap();
    TemplateFixture::malformed().write_to(project.path()).unwrap();

    project
        .docgen()
        .args(["check", "invoice.txt", "malformed.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ invoice.txt"))
        .stdout(predicate::str::contains("⚠ malformed.txt (2 issue(s))"))
        .stdout(predicate::str::contains(
            "malformed.txt:1:8: warning: '{#end}' without an open section, kept as text",
        ))
        .stdout(predicate::str::contains(
            "malformed.txt:2:1: warning: section 'lines' is never closed",
        ));
}

#[tokio::test]
async fn test_check_strict_exit_code() {
    let project = TestProject::new();
    TemplateFixture::invoice().write_to(project.path()).unwrap();
    TemplateFixture::malformed().write_to(project.path()).unwrap();

    project.docgen().args(["check", "invoice.txt", "--strict"]).assert().success();
    project
        .docgen()
        .args(["check", "invoice.txt", "malformed.txt", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 diagnostic(s) reported in strict mode"));
}

#[tokio::test]
async fn test_check_json_report() {
    let project = TestProject::new();
    project.write("a.txt", "{#x}open");

    let output = project.docgen().args(["check", "a.txt", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let reports: Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["template"], "a.txt");
    assert_eq!(report["well_formed"], false);
    assert!(report["fingerprint"].as_str().unwrap().starts_with("sha256:"));
    assert_eq!(report["diagnostics"][0]["kind"], "unbalanced_tag");
    assert_eq!(report["diagnostics"][0]["path"], "x");
    assert_eq!(report["diagnostics"][0]["position"], 0);
}

#[tokio::test]
async fn test_normalize_repairs_nesting() {
    let project = TestProject::new();
    project.write("t.txt", "{#a}{#b}x{#end}");

    project
        .docgen()
        .args(["normalize", "t.txt"])
        .assert()
        .success()
        .stdout("{#a}{#b}x{#end}{#end}")
        .stderr(predicate::str::contains("opens=2 closes=2"))
        .stderr(predicate::str::contains("section 'a' is never closed"));
}

#[tokio::test]
async fn test_normalize_mustache_output() {
    let project = TestProject::new();
    TemplateFixture::malformed().write_to(project.path()).unwrap();

    project
        .docgen()
        .args(["normalize", "malformed.txt", "--mustache"])
        .assert()
        .success()
        .stdout("Header {#end}\n{{#lines}}{{sku}}\n{{/lines}}")
        .stderr(predicate::str::contains("opens=1 closes=1"));
}

#[tokio::test]
async fn test_normalize_to_file() {
    let project = TestProject::new();
    project.write("t.txt", "{#items}{name}");

    project.docgen().args(["normalize", "t.txt", "-o", "fixed.txt"]).assert().success();
    assert_eq!(project.read("fixed.txt"), "{#items}{name}{#end}");
}

#[tokio::test]
async fn test_variables_lists_references() {
    let project = TestProject::new();
    TemplateFixture::invoice().write_to(project.path()).unwrap();

    let output = project
        .docgen()
        .args(["variables", "invoice.txt", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names = |key: &str| -> Vec<String> {
        report[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(
        names("variables"),
        vec!["currency", "customer.name", "index", "note", "number", "price", "qty", "sku"]
    );
    assert_eq!(names("sections"), vec!["lines", "note", "paid"]);
    assert!(report["variables"][0].get("found").is_none());
}

#[tokio::test]
async fn test_variables_checks_against_context() {
    let project = TestProject::new();
    project.write("t.txt", "Dear {customer.name}\n{#lines}{sku} {qty}{#end}{#paid}PAID{#end}{#extra}{#end}");
    project.write("d.json", r#"{"customer": {"name": "ACME"}, "lines": [{"sku": "A"}], "paid": false}"#);

    project
        .docgen()
        .args(["variables", "t.txt", "--context", "d.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ customer.name"))
        .stdout(predicate::str::contains("✓ sku"))
        .stdout(predicate::str::contains("✗ qty"))
        .stdout(predicate::str::contains("✓ lines"))
        .stdout(predicate::str::contains("✓ paid"))
        .stdout(predicate::str::contains("✗ extra"));
}

#[tokio::test]
async fn test_check_survives_pathologically_deep_nesting() {
    let project = TestProject::new();
    project.write("deep.txt", &"{#a}".repeat(200_000));

    project
        .docgen()
        .args(["check", "deep.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠ deep.txt (200000 issue(s))"))
        .stdout(predicate::str::contains("nested more than 256 sections deep, kept as text"))
        .stdout(predicate::str::contains("deep.txt:1:1: warning: section 'a' is never closed"));
}
