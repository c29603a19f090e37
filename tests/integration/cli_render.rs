//! `docgen render`, `docgen batch` and `docgen config` end to end.

use docgen_cli::test_utils::{ContextFixture, TemplateFixture, init_test_logging};
use predicates::prelude::*;

use crate::common::TestProject;

fn invoice_project() -> TestProject {
    let project = TestProject::new();
    TemplateFixture::invoice().write_to(project.path()).unwrap();
    ContextFixture::invoice_json().write_to(project.path()).unwrap();
    ContextFixture::invoice_override_toml().write_to(project.path()).unwrap();
    project
}

#[tokio::test]
async fn test_render_to_stdout() {
    init_test_logging(None);
    let project = invoice_project();

    project
        .docgen()
        .args(["render", "invoice.txt", "--data", "invoice.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Invoice INV-2024-001\nBill to: ACME GmbH\n"))
        .stdout(predicate::str::contains("1. BOLT-8 x100 @ 0.12 EUR"))
        .stderr(predicate::str::contains("warning").not());
}

#[tokio::test]
async fn test_render_layers_data_files() {
    let project = invoice_project();

    project
        .docgen()
        .args(["render", "invoice.txt", "-d", "invoice.json", "-d", "override.toml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Invoice INV-2024-002\n"))
        .stdout(predicate::str::ends_with("PAID"));
}

#[tokio::test]
async fn test_render_writes_output_file() {
    let project = invoice_project();
    project.write("out/.keep", "");

    project
        .docgen()
        .args(["render", "invoice.txt", "-d", "invoice.json", "-o", "out/invoice.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(project.read("out/invoice.txt").starts_with("Invoice INV-2024-001"));
}

#[tokio::test]
async fn test_render_reports_missing_variables_with_suggestion() {
    let project = TestProject::new();
    project.write("t.txt", "Dear {custmer.name}\n");
    project.write("d.json", r#"{"customer": {"name": "ACME"}}"#);

    project
        .docgen()
        .args(["render", "t.txt", "-d", "d.json"])
        .assert()
        .success()
        .stdout("Dear \n")
        .stderr(predicate::str::contains("t.txt:1:6: warning: missing variable 'custmer.name'"))
        .stderr(predicate::str::contains("did you mean: customer.name"));
}

#[tokio::test]
async fn test_render_strict_fails_on_diagnostics() {
    let project = TestProject::new();
    project.write("t.txt", "text {#end} more");

    project
        .docgen()
        .args(["render", "t.txt", "--strict"])
        .assert()
        .failure()
        .stdout("text {#end} more")
        .stderr(predicate::str::contains("1 diagnostic(s) reported in strict mode"));

    project.docgen().args(["render", "t.txt"]).assert().success();
}

#[tokio::test]
async fn test_strict_from_config_file() {
    let project = TestProject::new();
    project.write("t.txt", "{missing}");
    project.write("config.toml", "strict = true\n");

    project.docgen().args(["render", "t.txt"]).assert().failure();
}

#[tokio::test]
async fn test_render_json_format() {
    let project = TestProject::new();
    project.write("t.txt", "Hi {name}\n{#a}x");
    project.write("d.yaml", "name: Ada\n");

    let output = project
        .docgen()
        .args(["render", "t.txt", "-d", "d.yaml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["output"], "Hi Ada\n");
    let diagnostics = document["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "unbalanced_tag");
    assert_eq!(diagnostics[0]["path"], "a");
    assert_eq!(diagnostics[0]["line"], 2);
    assert_eq!(diagnostics[0]["column"], 1);
}

#[tokio::test]
async fn test_render_missing_template_is_friendly_error() {
    let project = TestProject::new();

    project
        .docgen()
        .args(["render", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template file not found"))
        .stderr(predicate::str::contains("suggestion"));
}

#[tokio::test]
async fn test_render_unsupported_data_format() {
    let project = TestProject::new();
    project.write("t.txt", "{x}");
    project.write("d.ini", "x=1");

    project
        .docgen()
        .args(["render", "t.txt", "-d", "d.ini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported context file format"));
}

#[tokio::test]
async fn test_oversized_template_rejected_by_config() {
    let project = TestProject::new();
    project.write("t.txt", &"x".repeat(100));
    project.write("config.toml", "max_template_size = 10\n");

    project
        .docgen()
        .args(["render", "t.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the 10 byte limit"));
}

#[tokio::test]
async fn test_templates_dir_from_config() {
    let project = TestProject::new();
    project.write("templates/hello.txt", "Hello {name}");
    project.write("d.json", r#"{"name": "World"}"#);
    let templates = project.path().join("templates");
    project.write(
        "config.toml",
        &format!("templates_dir = {:?}\n", templates.display().to_string()),
    );

    project
        .docgen()
        .args(["render", "hello.txt", "-d", "d.json"])
        .assert()
        .success()
        .stdout("Hello World");
}

#[tokio::test]
async fn test_batch_renders_every_data_file() {
    init_test_logging(None);
    let project = TestProject::new();
    project.write("t.txt", "Order {id}: {#lines}{sku} {#end}");
    project.write("a.json", r#"{"id": 1, "lines": [{"sku": "X"}]}"#);
    project.write("b.yaml", "id: 2\nlines:\n  - sku: Y\n  - sku: Z\n");
    project.write("c.toml", "id = 3\n");

    project
        .docgen()
        .args(["batch", "t.txt", "a.json", "b.yaml", "c.toml", "--out-dir", "out", "--max-parallel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 3 document(s)"));

    assert_eq!(project.read("out/a.out"), "Order 1: X ");
    assert_eq!(project.read("out/b.out"), "Order 2: Y Z ");
    assert_eq!(project.read("out/c.out"), "Order 3: ");
}

#[tokio::test]
async fn test_batch_rejects_duplicate_stems() {
    let project = TestProject::new();
    project.write("t.txt", "{id}");
    project.write("a.json", r#"{"id": 1}"#);
    project.write("a.yaml", "id: 2\n");

    project
        .docgen()
        .args(["batch", "t.txt", "a.json", "a.yaml", "--out-dir", "out"])
        .assert()
        .failure();
    assert!(!project.exists("out/a.out"));
}

#[tokio::test]
async fn test_batch_strict_counts_all_documents() {
    let project = TestProject::new();
    project.write("t.txt", "{name}");
    project.write("a.json", r#"{"name": "A"}"#);
    project.write("b.json", "{}");

    project
        .docgen()
        .args(["batch", "t.txt", "a.json", "b.json", "--out-dir", "out", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 diagnostic(s) reported in strict mode"));

    assert_eq!(project.read("out/a.out"), "A");
    assert_eq!(project.read("out/b.out"), "");
}

#[tokio::test]
async fn test_config_init_show_and_path() {
    let project = TestProject::new();

    project
        .docgen()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    project
        .docgen()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file not found, showing defaults"))
        .stdout(predicate::str::contains("max_template_size = 1048576"));

    project.docgen().args(["config", "init"]).assert().success();
    assert!(project.read("config.toml").contains("strict = false"));

    project
        .docgen()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[tokio::test]
async fn test_explicit_config_flag_wins_over_env() {
    let project = TestProject::new();
    project.write("t.txt", "{missing}");
    project.write("lenient.toml", "strict = false\n");
    project.write("config.toml", "strict = true\n");

    project
        .docgen()
        .args(["--config", "lenient.toml", "render", "t.txt"])
        .assert()
        .success();
}
