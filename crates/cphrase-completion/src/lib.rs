//! cphrase Completion Pipeline
//!
//! Turns raw phrase candidates from a grammar-aware suggestion source into
//! editor-ready, de-duplicated insertion text for C code.
//!
//! # Architecture
//!
//! 1. **Context Layer**: split the document at the cursor and tag it with its length
//! 2. **Normalization Layer**: canonicalize operator spacing so fragments compare
//!    equal regardless of how they were typed
//! 3. **Reconciliation Layer**: strip the echo of the label and of the typed
//!    prefix from a generated body, then cut it to one statement
//! 4. **Selection Layer**: cap candidates while keeping the source's order
//! 5. **Splice Layer**: merge resolved text with the word under the cursor
//!
//! The suggestion source and the insert-text generator are external services,
//! reached through the traits in [`source`].
//!
//! # Example
//!
//! ```ignore
//! use cphrase_completion::*;
//!
//! let reconciler = Reconciler::default();
//! let reconciled = reconciler.reconcile(
//!     "TextWindow.Show",
//!     Some("TextWindow.Show();"),
//!     &Prefixes::new("Text", "Text"),
//! )?;
//! assert_eq!(reconciled.insert_text, "();");
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod normalize;
pub mod ranker;
pub mod reconcile;
pub mod source;
pub mod splice;
pub mod types;

// Re-export public types and traits
pub use config::{CompletionConfig, ConfigFormat, ConfigLoader, PROMPT_PLACEHOLDER};
pub use context::{extract_context, line_prefix, prefixes_at};
pub use engine::PhraseCompletionEngine;
pub use normalize::{normalize, respace_operators};
pub use ranker::{CandidateSelector, Cap, PrefixSelector};
pub use reconcile::{OverlapRule, Reconciled, Reconciler};
pub use source::{
    CallbackSource, CallbackSuggestionSource, CandidateReply, InsertTextGenerator,
    SuggestionSource,
};
pub use splice::{plain_insert_text, prompt_insert_text, reduce_line_prefix};
pub use types::*;
