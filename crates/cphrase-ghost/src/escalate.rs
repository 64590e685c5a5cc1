/// Escalation to the generative text service
///
/// The ghost text (or a whole document) is embedded in a prompt template and
/// sent to a generative service. An absent or blank reply is a failure.
use crate::error::{GhostError, GhostResult};
use async_trait::async_trait;
use cphrase_completion::PROMPT_PLACEHOLDER;
use tracing::{info, warn};

/// Generative text service
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Generate text for `prompt`; `None` when the service has no answer
    async fn generate(&self, prompt: &str) -> GhostResult<Option<String>>;
}

/// Embed `text` in `template` at the `{text}` placeholder
pub fn build_prompt(template: &str, text: &str) -> String {
    if template.contains(PROMPT_PLACEHOLDER) {
        template.replacen(PROMPT_PLACEHOLDER, text, 1)
    } else {
        format!("{}\n\n{}", template, text)
    }
}

/// Ask `service` for `prompt`, treating an absent or blank reply as a failure.
///
/// The returned text is trimmed.
pub async fn request_generation(
    service: &dyn GenerativeService,
    prompt: &str,
) -> GhostResult<String> {
    match service.generate(prompt).await {
        Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Ok(_) => Err(GhostError::GeneratorUnavailable(
            "no text returned".to_string(),
        )),
        Err(GhostError::GeneratorUnavailable(reason)) => {
            Err(GhostError::GeneratorUnavailable(reason))
        }
        Err(e) => Err(GhostError::GeneratorUnavailable(e.to_string())),
    }
}

/// Code the user entered next to what the service proposes for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WholeDocumentProposal {
    pub entered: String,
    pub proposed: String,
}

impl WholeDocumentProposal {
    /// Both versions in one read-only view
    pub fn render_side_by_side(&self) -> String {
        format!(
            "[Code entered]\n{}\n\n==\n\n[Proposed Code]\n{}",
            self.entered, self.proposed
        )
    }
}

/// Send a whole document to the service and pair the answer with the input
pub async fn generate_whole_document(
    service: &dyn GenerativeService,
    template: &str,
    document: &str,
) -> GhostResult<WholeDocumentProposal> {
    let prompt = build_prompt(template, document);

    match request_generation(service, &prompt).await {
        Ok(proposed) => {
            info!("Whole-document proposal received ({} chars)", proposed.len());
            Ok(WholeDocumentProposal {
                entered: document.to_string(),
                proposed,
            })
        }
        Err(e) => {
            warn!("Whole-document generation failed: {}", e);
            Err(e)
        }
    }
}
