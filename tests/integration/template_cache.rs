//! Sharing compiled trees between concurrent renders.

use docgen_cli::templating::TemplateCache;
use docgen_cli::test_utils::{TemplateFixture, init_test_logging, invoice_context};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_concurrent_renders_share_one_tree() {
    init_test_logging(None);
    let cache = Arc::new(TemplateCache::new());
    let raw = TemplateFixture::invoice().content;
    let compiled = cache.get_or_compile("invoice", &raw).unwrap();
    let expected = compiled.render(&invoice_context()).output;

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let raw = raw.clone();
            tokio::task::spawn_blocking(move || {
                let template = cache.get_or_compile("invoice", &raw).unwrap();
                template.render(&invoice_context()).output
            })
        })
        .collect();

    for result in join_all(tasks).await {
        assert_eq!(result.unwrap(), expected);
    }

    assert_eq!(cache.len(), 1);
    let (hits, misses) = cache.stats();
    assert_eq!(misses, 1);
    assert_eq!(hits, 16);
}

#[tokio::test]
async fn test_replacement_does_not_disturb_held_tree() {
    let cache = TemplateCache::new();
    let old = cache.get_or_compile("greeting", "Hello {name}").unwrap();
    let new = cache.get_or_compile("greeting", "Goodbye {name}").unwrap();

    let context = json!({"name": "Ada"});
    let (old_out, new_out) = tokio::join!(
        async { old.render(&context).output },
        async { new.render(&context).output },
    );

    assert_eq!(old_out, "Hello Ada");
    assert_eq!(new_out, "Goodbye Ada");
    assert_eq!(cache.get("greeting").unwrap().fingerprint(), new.fingerprint());
}

#[test]
fn test_distinct_contexts_against_cached_tree() {
    let cache = TemplateCache::new();
    let template = cache.get_or_compile("list", "{#items}[{item}]{#end}").unwrap();

    let outputs: Vec<_> = [json!({"items": ["a"]}), json!({"items": []}), json!({"items": ["x", "y"]})]
        .iter()
        .map(|ctx| template.render(ctx).output)
        .collect();

    assert_eq!(outputs, vec!["[a]", "", "[x][y]"]);
}
