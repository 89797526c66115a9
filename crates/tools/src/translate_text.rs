//! Translation tool — simulated phrase-book translation.
//!
//! Knows a handful of English phrases in Vietnamese and Spanish. Anything
//! else gets a bracketed placeholder so the model can still answer.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::Tool;

use crate::str_arg;

const VIETNAMESE: &[(&str, &str)] = &[
    ("hello", "xin chào"),
    ("thank you", "cảm ơn"),
    ("goodbye", "tạm biệt"),
    ("how are you", "bạn khỏe không"),
];

const SPANISH: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("thank you", "gracias"),
    ("goodbye", "adiós"),
    ("how are you", "¿cómo estás?"),
];

pub struct TranslateTextTool;

fn lookup(table: &[(&'static str, &'static str)], english: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(en, _)| *en == english)
        .map(|(_, translated)| *translated)
}

fn reverse_lookup(
    table: &[(&'static str, &'static str)],
    translated: &str,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, t)| *t == translated)
        .map(|(en, _)| *en)
}

pub(crate) fn translate(text: &str, from: &str, to: &str) -> String {
    let lower = text.to_lowercase();

    match (from, to) {
        ("en", "vi") => {
            let vi = lookup(VIETNAMESE, &lower)
                .map(String::from)
                .unwrap_or_else(|| format!("[Vietnamese translation of: {text}]"));
            format!("English: \"{text}\"\nVietnamese: \"{vi}\"")
        }
        ("vi", "en") => {
            let en = reverse_lookup(VIETNAMESE, &lower)
                .map(String::from)
                .unwrap_or_else(|| format!("[English translation of: {text}]"));
            format!("Vietnamese: \"{text}\"\nEnglish: \"{en}\"")
        }
        ("en", "es") => {
            let es = lookup(SPANISH, &lower)
                .map(String::from)
                .unwrap_or_else(|| format!("[Spanish translation of: {text}]"));
            format!("English: \"{text}\"\nSpanish: \"{es}\"")
        }
        _ => format!(
            "Translation from {from} to {to}:\n\"{text}\" → [Translation would be provided by a real translation service]"
        ),
    }
}

#[async_trait]
impl Tool for TranslateTextTool {
    fn name(&self) -> &str {
        "translate_text"
    }

    fn description(&self) -> &str {
        "Translate text between languages to help with English learning"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to translate"
                },
                "from_language": {
                    "type": "string",
                    "description": "Source language code (e.g., 'vi', 'es', 'fr')"
                },
                "to_language": {
                    "type": "string",
                    "description": "Target language code (usually 'en' for English)"
                }
            },
            "required": ["text", "to_language"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let Some(text) = str_arg(&arguments, "text") else {
            return Ok("Error: No text provided for translation.".into());
        };
        let from = str_arg(&arguments, "from_language").unwrap_or("auto");
        let to = str_arg(&arguments, "to_language").unwrap_or("en");

        Ok(translate(text, from, to))
    }
}
