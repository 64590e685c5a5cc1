/// Completion-list engine
///
/// Two paths feed the host's completion list:
///
/// - **Plain**: every candidate becomes an entry labelled with its phrase. The
///   body is only generated when the host resolves the entry.
/// - **Prompt**: the first few candidates are reconciled up front and the entry
///   shows the reconciled continuation itself.
///
/// # Example
///
/// ```ignore
/// use cphrase_completion::*;
/// use std::sync::Arc;
///
/// let engine = PhraseCompletionEngine::new(
///     Arc::new(my_source),
///     Arc::new(my_generator),
///     Arc::new(PrefixSelector::new()),
///     CompletionConfig::default(),
/// );
///
/// let items = engine.prompt_completions("int x = ", 8).await?;
/// let chosen = engine.resolve_prompt(&items[0]);
/// ```
use crate::config::CompletionConfig;
use crate::context::{extract_context, prefixes_at};
use crate::ranker::{plain_suggestion, prompt_suggestion, CandidateSelector, Cap};
use crate::reconcile::Reconciler;
use crate::source::{InsertTextGenerator, SuggestionSource};
use crate::splice::{plain_insert_text, prompt_insert_text};
use crate::types::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phrase completion engine
pub struct PhraseCompletionEngine {
    source: Arc<dyn SuggestionSource>,
    generator: Arc<dyn InsertTextGenerator>,
    selector: Arc<dyn CandidateSelector>,
    reconciler: Reconciler,
    config: CompletionConfig,
}

impl PhraseCompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    ///
    /// * `source` - Suggestion source for phrase candidates
    /// * `generator` - Generator for candidate bodies
    /// * `selector` - Selector deciding which candidates get reconciled
    /// * `config` - Completion configuration
    pub fn new(
        source: Arc<dyn SuggestionSource>,
        generator: Arc<dyn InsertTextGenerator>,
        selector: Arc<dyn CandidateSelector>,
        config: CompletionConfig,
    ) -> Self {
        let reconciler = Reconciler::new(config.sentinel_marker.clone());
        Self {
            source,
            generator,
            selector,
            reconciler,
            config,
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Ask the suggestion source for candidates at the cursor.
    ///
    /// # Errors
    ///
    /// [`CompletionError::EmptySuggestionResult`] when the source has nothing,
    /// otherwise whatever the context extraction or the source reports.
    pub async fn fetch(&self, document: &str, cursor: usize) -> CompletionResult<Vec<Candidate>> {
        let context = extract_context(document, cursor, &self.config.length_tag_marker)?;
        let candidates = self.source.fetch_candidates(&context).await?;

        if candidates.is_empty() {
            return Err(CompletionError::EmptySuggestionResult);
        }

        info!("Received {} candidates for {}", candidates.len(), context.length_tag);
        Ok(candidates)
    }

    async fn fetch_or_empty(
        &self,
        document: &str,
        cursor: usize,
    ) -> CompletionResult<Vec<Candidate>> {
        match self.fetch(document, cursor).await {
            Err(CompletionError::EmptySuggestionResult) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Entries for the plain path, one per candidate
    pub async fn plain_completions(
        &self,
        document: &str,
        cursor: usize,
    ) -> CompletionResult<Vec<ReconciledSuggestion>> {
        let prefixes = prefixes_at(document, cursor)?;
        let candidates = self.fetch_or_empty(document, cursor).await?;
        Ok(self.plain_items(&candidates, &prefixes.line))
    }

    /// Build plain-path entries from already fetched candidates
    pub fn plain_items(
        &self,
        candidates: &[Candidate],
        line_prefix: &str,
    ) -> Vec<ReconciledSuggestion> {
        self.selector
            .select(candidates, Cap::Unbounded)
            .into_iter()
            .map(|candidate| plain_suggestion(candidate, line_prefix))
            .collect()
    }

    /// Fill in the insert text of a plain-path entry the host is resolving
    pub async fn resolve_plain(&self, item: &ReconciledSuggestion) -> ReconciledSuggestion {
        let body = self
            .generate_body(&item.display_label, &self.config.plain_path_context)
            .await;

        ReconciledSuggestion {
            insert_text: plain_insert_text(&item.filter_text, body.as_deref()),
            ..item.clone()
        }
    }

    /// Entries for the prompt path, reconciled against the typed prefixes
    pub async fn prompt_completions(
        &self,
        document: &str,
        cursor: usize,
    ) -> CompletionResult<Vec<ReconciledSuggestion>> {
        let prefixes = prefixes_at(document, cursor)?;
        let candidates = self.fetch_or_empty(document, cursor).await?;
        Ok(self.reconcile_candidates(&candidates, &prefixes).await)
    }

    /// Reconcile the selected candidates, in order.
    ///
    /// Only candidates within the prompt cap reach the generator. A candidate
    /// that cannot be reconciled still yields an entry with empty insert text,
    /// so the number of entries always equals the number selected.
    pub async fn reconcile_candidates(
        &self,
        candidates: &[Candidate],
        prefixes: &Prefixes,
    ) -> Vec<ReconciledSuggestion> {
        let selected = self
            .selector
            .select(candidates, Cap::Limited(self.config.prompt_cap));
        let mut items = Vec::with_capacity(selected.len());

        for candidate in selected {
            let label = candidate.label();
            let body = self.generate_body(label, &prefixes.resolved).await;

            let insert_text = match self.reconciler.reconcile(label, body.as_deref(), prefixes) {
                Ok(reconciled) => reconciled.insert_text,
                Err(e) => {
                    debug!("Keeping '{}' with empty text: {}", label, e);
                    String::new()
                }
            };

            items.push(prompt_suggestion(candidate, insert_text, &prefixes.line));
        }

        items
    }

    /// Final insert text of a prompt-path entry the host is resolving
    pub fn resolve_prompt(&self, item: &ReconciledSuggestion) -> ReconciledSuggestion {
        ReconciledSuggestion {
            insert_text: prompt_insert_text(&item.filter_text, &item.display_label),
            ..item.clone()
        }
    }

    async fn generate_body(&self, label: &str, context: &str) -> Option<String> {
        match self.generator.insert_text(label, context).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Insert-text generation failed for '{}': {}", label, e);
                None
            }
        }
    }
}
