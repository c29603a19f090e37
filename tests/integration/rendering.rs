//! Compile-and-render behaviour through the public library API.

use docgen_cli::context::{deep_merge, load_layers};
use docgen_cli::templating::normalizer::MAX_SECTION_DEPTH;
use docgen_cli::templating::{DiagnosticKind, compile};
use docgen_cli::test_utils::{
    ContextFixture, TemplateFixture, init_test_logging, invoice_context,
};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_plain_interpolation() {
    let outcome = compile("Hello {name}!").unwrap().render(&json!({"name": "World"}));
    assert_eq!(outcome.output, "Hello World!");
    assert!(outcome.is_clean());
}

#[test]
fn test_sequence_section_loops_in_order() {
    let template = compile("{#items}{name} {#end}").unwrap();
    let outcome = template.render(&json!({"items": [{"name": "A"}, {"name": "B"}]}));
    assert_eq!(outcome.output, "A B ");
    assert!(outcome.is_clean());
}

#[test]
fn test_false_flag_hides_section() {
    let outcome = compile("{#flag}Shown{#end}").unwrap().render(&json!({"flag": false}));
    assert_eq!(outcome.output, "");
    assert!(outcome.is_clean());
}

#[test]
fn test_orphan_close_is_kept_as_text() {
    let outcome = compile("text {#end} more").unwrap().render(&json!({}));
    assert_eq!(outcome.output, "text {#end} more");
    assert_eq!(outcome.unbalanced_tags().count(), 1);
    assert_eq!(outcome.diagnostics[0].position, 5);
}

#[test]
fn test_unclosed_sections_are_closed_at_end() {
    let template = compile("{#a}{#b}x").unwrap();
    assert_eq!(template.diagnostics().len(), 2);

    let outcome = template.render(&json!({"a": {"b": "y"}}));
    assert_eq!(outcome.output, "x");
    assert_eq!(outcome.unbalanced_tags().count(), 2);
    assert_eq!(outcome.missing_variables().count(), 0);
}

#[test]
fn test_missing_path_reports_full_name() {
    let outcome = compile("{unknown.path}").unwrap().render(&json!({}));
    assert_eq!(outcome.output, "");
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MissingVariable);
    assert_eq!(outcome.diagnostics[0].path, "unknown.path");
}

#[test]
fn test_markup_without_directives_is_unchanged() {
    let raw = "<p>Total: 100 EUR</p>\n{ not a tag }\n{}";
    let outcome = compile(raw).unwrap().render(&json!({"anything": 1}));
    assert_eq!(outcome.output, raw);
    assert!(outcome.is_clean());
}

#[test]
fn test_compiled_template_renders_many_contexts() {
    let template = compile("{#lines}{sku};{#end}").unwrap();

    let first = template.render(&json!({"lines": [{"sku": "A"}]}));
    let second = template.render(&json!({"lines": [{"sku": "B"}, {"sku": "C"}]}));
    let again = template.render(&json!({"lines": [{"sku": "A"}]}));

    assert_eq!(first.output, "A;");
    assert_eq!(second.output, "B;C;");
    assert_eq!(first, again);
}

#[test]
fn test_invoice_fixture_against_invoice_data() {
    init_test_logging(None);
    let template = compile(&TemplateFixture::invoice().content).unwrap();
    assert!(template.is_well_formed());

    let outcome = template.render(&invoice_context());
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    assert_eq!(
        outcome.output,
        "Invoice INV-2024-001\n\
         Bill to: ACME GmbH\n\
         1. BOLT-8 x100 @ 0.12 EUR\n\
         2. NUT-8 x100 @ 0.05 EUR\n"
    );
}

#[test]
fn test_invoice_with_override_layer() {
    let template = compile(&TemplateFixture::invoice().content).unwrap();
    let context = deep_merge(invoice_context(), json!({"paid": true, "note": "Thank you"}));

    let outcome = template.render(&context);
    assert!(outcome.output.ends_with("EUR\nPAIDNote: Thank you"));
}

#[tokio::test]
async fn test_layered_files_feed_the_renderer() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let base = ContextFixture::invoice_json().write_to(temp.path()).unwrap();
    let overrides = ContextFixture::invoice_override_toml().write_to(temp.path()).unwrap();

    let context = load_layers(&[base, overrides]).await.unwrap();
    let outcome = compile(&TemplateFixture::invoice().content).unwrap().render(&context);

    assert!(outcome.output.starts_with("Invoice INV-2024-002\n"));
    assert!(outcome.output.contains("Bill to: ACME GmbH\n"));
    assert!(outcome.output.ends_with("PAID"));
}

#[tokio::test]
async fn test_shipment_fixture_from_yaml() {
    let temp = TempDir::new().unwrap();
    let data = ContextFixture::shipment_yaml().write_to(temp.path()).unwrap();

    let context = load_layers(&[data]).await.unwrap();
    let outcome = compile(&TemplateFixture::shipment().content).unwrap().render(&context);

    assert_eq!(outcome.output, "Shipment SH-9\n- T1 (DHL)\n- T2 (DHL)\n");
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
}

#[test]
fn test_malformed_fixture_degrades_gracefully() {
    let template = compile(&TemplateFixture::malformed().content).unwrap();
    let outcome = template.render(&json!({"lines": [{"sku": "A"}, {"sku": "B"}]}));

    assert_eq!(outcome.output, "Header {#end}\nA\nB\n");
    assert_eq!(outcome.unbalanced_tags().count(), 2);
}

#[test]
fn test_missing_variable_reported_per_evaluation() {
    let template = compile("{#items}{price}{#end}").unwrap();
    let outcome = template.render(&json!({"items": [{}, {}, {"price": 3}]}));

    assert_eq!(outcome.output, "3");
    assert_eq!(outcome.missing_variables().count(), 2);
}

#[test]
fn test_rendering_never_fails_on_hostile_input() {
    let inputs = [
        "{#end}{#end}{#end}",
        "{#}{#end}",
        "{{{#a}}}",
        "{#a}{#b}{#c}",
        "{",
        "}{#end",
        "{#a}{#end}{#end}{#b}",
    ];
    for raw in inputs {
        let template = compile(raw).unwrap();
        let outcome = template.render(&json!({"a": [1, 2], "b": {"c": true}}));
        assert!(
            outcome.diagnostics.iter().all(|d| d.position <= raw.len()),
            "positions out of range for {raw:?}"
        );
    }
}

#[test]
fn test_deeply_nested_template_renders_without_crashing() {
    let raw = "{#a}".repeat(200_000);
    let template = compile(&raw).unwrap();
    assert_eq!(template.diagnostics().len(), 200_000);

    let outcome = template.render(&json!({}));
    assert_eq!(outcome.output, "");
    assert_eq!(outcome.missing_variables().count(), 0);

    // Truthy at every kept level reaches the demoted text
    let outcome = template.render(&json!({"a": true}));
    assert_eq!(outcome.output.len(), (200_000 - MAX_SECTION_DEPTH) * "{#a}".len());
    drop(template);
}

#[test]
fn test_deep_but_balanced_nesting_keeps_excess_as_text() {
    let depth = MAX_SECTION_DEPTH + 2;
    let raw = format!("{}x{}", "{#a}".repeat(depth), "{#end}".repeat(depth));
    let template = compile(&raw).unwrap();
    assert_eq!(template.diagnostics().len(), 2);

    let outcome = template.render(&json!({"a": true}));
    assert_eq!(outcome.output, "{#a}{#a}x{#end}{#end}");
}

#[test]
fn test_bare_dot_section_reads_document_fields() {
    let template = compile("{#items}{#.}{name}{#end}|{#end}").unwrap();
    let outcome = template.render(&json!({"name": "Doc", "items": [{"name": "Line"}]}));
    assert_eq!(outcome.output, "Doc|");
    assert!(outcome.is_clean());
}
