//! English-learning helper tools for Parley.
//!
//! Each tool answers from a canned table: translations, grammar notes,
//! vocabulary, pronunciation, practice dialogues and common mistakes. The
//! model decides when to call them; the orchestrator feeds the text back.

pub mod common_mistakes;
pub mod conversation_practice;
pub mod grammar_explanation;
pub mod pronunciation_guide;
pub mod translate_text;
pub mod vocabulary_examples;

use parley_core::tool::ToolRegistry;

pub use common_mistakes::CommonMistakesTool;
pub use conversation_practice::ConversationPracticeTool;
pub use grammar_explanation::GrammarExplanationTool;
pub use pronunciation_guide::PronunciationGuideTool;
pub use translate_text::TranslateTextTool;
pub use vocabulary_examples::VocabularyExamplesTool;

/// Create a registry with all six tools, in catalog order.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(TranslateTextTool));
    registry.register(Box::new(GrammarExplanationTool));
    registry.register(Box::new(VocabularyExamplesTool));
    registry.register(Box::new(PronunciationGuideTool));
    registry.register(Box::new(ConversationPracticeTool));
    registry.register(Box::new(CommonMistakesTool));
    registry
}

/// A non-empty string argument, if present.
pub(crate) fn str_arg<'a>(arguments: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    arguments[key].as_str().filter(|s| !s.is_empty())
}

/// Uppercase the first character.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render lines as `• item` bullets.
pub(crate) fn bullets(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_catalog_in_order() {
        let registry = default_registry();
        assert_eq!(
            registry.names(),
            vec![
                "translate_text",
                "get_grammar_explanation",
                "get_vocabulary_examples",
                "get_pronunciation_guide",
                "get_conversation_practice",
                "get_common_mistakes",
            ]
        );
    }

    #[test]
    fn every_definition_is_an_object_schema() {
        for def in default_registry().definitions() {
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert!(def.parameters["required"].is_array(), "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }

    #[tokio::test]
    async fn registry_dispatches_by_name() {
        let registry = default_registry();
        let out = registry
            .execute("get_pronunciation_guide", serde_json::json!({"word": "tomato"}))
            .await
            .unwrap();
        assert!(out.contains("tuh-MAY-toh"));
    }

    #[test]
    fn helpers() {
        assert_eq!(capitalize("past perfect"), "Past perfect");
        assert_eq!(capitalize(""), "");
        assert_eq!(bullets(&["a", "b"]), "• a\n• b");
        let args = serde_json::json!({"text": "", "word": "hi"});
        assert_eq!(str_arg(&args, "text"), None);
        assert_eq!(str_arg(&args, "word"), Some("hi"));
        assert_eq!(str_arg(&args, "missing"), None);
    }
}
