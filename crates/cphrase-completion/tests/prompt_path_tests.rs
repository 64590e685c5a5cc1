/// Integration tests for the prompt and plain completion paths
use async_trait::async_trait;
use cphrase_completion::{
    Candidate, CompletionConfig, CompletionResult, Context, InsertTextGenerator,
    PhraseCompletionEngine, PrefixSelector, SuggestionSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock suggestion source returning a fixed ranking
struct RankedSource {
    candidates: Vec<Candidate>,
}

#[async_trait]
impl SuggestionSource for RankedSource {
    async fn fetch_candidates(&self, _context: &Context) -> CompletionResult<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// Mock generator that echoes the label and counts calls
#[derive(Default)]
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl InsertTextGenerator for EchoGenerator {
    async fn insert_text(&self, label: &str, _context: &str) -> CompletionResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(format!("{}(); extra();", label)))
    }
}

fn ten_candidates() -> Vec<Candidate> {
    (0..10)
        .map(|i| Candidate::new(format!("call{}", i), (10 - i) as f64, format!("{:02}", i)))
        .collect()
}

fn engine(generator: Arc<EchoGenerator>) -> PhraseCompletionEngine {
    PhraseCompletionEngine::new(
        Arc::new(RankedSource {
            candidates: ten_candidates(),
        }),
        generator,
        Arc::new(PrefixSelector::new()),
        CompletionConfig::default(),
    )
}

#[tokio::test]
async fn test_prompt_path_caps_at_three_in_order() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = engine(generator.clone());

    let items = engine.prompt_completions("int main() {\n    ", 17).await.unwrap();

    assert_eq!(items.len(), 3);
    let docs: Vec<&str> = items.iter().map(|i| i.documentation.as_str()).collect();
    assert_eq!(docs, vec!["call0", "call1", "call2"]);
    assert_eq!(items[1].sort_text, "01");
}

#[tokio::test]
async fn test_prompt_path_never_reconciles_beyond_cap() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = engine(generator.clone());

    engine.prompt_completions("", 0).await.unwrap();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_prompt_path_strips_label_and_truncates() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = engine(generator);

    let items = engine.prompt_completions("", 0).await.unwrap();

    assert_eq!(items[0].insert_text, "();");
    assert_eq!(items[0].display_label, "();");
}

#[tokio::test]
async fn test_plain_path_is_unbounded_and_lazy() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = engine(generator.clone());

    let items = engine.plain_completions("ca", 2).await.unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(items[3].documentation, "Frequency : 7");
}

#[tokio::test]
async fn test_prompt_path_with_custom_cap() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = PhraseCompletionEngine::new(
        Arc::new(RankedSource {
            candidates: ten_candidates(),
        }),
        generator.clone(),
        Arc::new(PrefixSelector::new()),
        CompletionConfig {
            prompt_cap: 5,
            ..Default::default()
        },
    );

    let items = engine.prompt_completions("", 0).await.unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_prompt_path_out_of_range_cursor() -> anyhow::Result<()> {
    let engine = engine(Arc::new(EchoGenerator::default()));

    let result = engine.prompt_completions("int", 4).await;
    assert!(result.is_err());

    let items = engine.prompt_completions("int", 3).await?;
    assert_eq!(items.len(), 3);
    Ok(())
}

#[test]
fn test_plain_resolve_prepends_member_prefix() {
    let generator = Arc::new(EchoGenerator::default());
    let engine = engine(generator.clone());

    let items = tokio_test::block_on(engine.plain_completions("obj.ca", 6)).unwrap();
    let resolved = tokio_test::block_on(engine.resolve_plain(&items[0]));

    assert_eq!(resolved.insert_text, "cacall0(); extra();");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}
