//! Chat-completion providers for Parley.
//!
//! [`OpenAiCompatProvider`] speaks the `/chat/completions` wire format.
//! [`CompletionClient`] sits on top of any `Provider` and applies the tutor's
//! sampling defaults and tool advertising.

pub mod completion;
pub mod openai_compat;

pub use completion::{CompletionClient, CompletionOptions};
pub use openai_compat::OpenAiCompatProvider;
