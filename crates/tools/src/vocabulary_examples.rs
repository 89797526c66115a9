//! Vocabulary tool — definition, examples, synonyms and antonyms.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::Tool;

use crate::{bullets, str_arg};

struct Entry {
    definition: String,
    examples: Vec<String>,
    synonyms: Vec<String>,
    antonyms: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn entry(word: &str) -> Entry {
    match word.to_lowercase().as_str() {
        "perseverance" => Entry {
            definition: "Persistence in doing something despite difficulty or delay in achieving success.".into(),
            examples: owned(&[
                "Her perseverance in learning English paid off when she got the job.",
                "The team showed great perseverance during the difficult project.",
                "Success comes from perseverance, not luck.",
            ]),
            synonyms: owned(&["determination", "persistence", "tenacity", "resolve"]),
            antonyms: owned(&["giving up", "quitting", "surrender"]),
        },
        "serendipity" => Entry {
            definition: "The occurrence and development of events by chance in a happy or beneficial way.".into(),
            examples: owned(&[
                "Meeting my business partner was pure serendipity.",
                "The discovery of penicillin was a serendipitous event.",
                "Sometimes the best opportunities come through serendipity.",
            ]),
            synonyms: owned(&["chance", "fortune", "luck", "coincidence"]),
            antonyms: owned(&["misfortune", "bad luck", "planned"]),
        },
        "ubiquitous" => Entry {
            definition: "Present, appearing, or found everywhere.".into(),
            examples: owned(&[
                "Smartphones have become ubiquitous in modern society.",
                "The ubiquitous presence of social media affects everyone.",
                "Coffee shops are ubiquitous in this neighborhood.",
            ]),
            synonyms: owned(&["omnipresent", "widespread", "prevalent", "common"]),
            antonyms: owned(&["rare", "scarce", "uncommon", "limited"]),
        },
        _ => Entry {
            definition: format!("A word meaning \"{word}\""),
            examples: vec![
                format!("I learned the word \"{word}\" in my English class."),
                format!("Can you use \"{word}\" in a sentence?"),
                format!("The word \"{word}\" is commonly used in English."),
            ],
            synonyms: owned(&["similar words", "related terms"]),
            antonyms: owned(&["opposite words", "contrary terms"]),
        },
    }
}

pub struct VocabularyExamplesTool;

#[async_trait]
impl Tool for VocabularyExamplesTool {
    fn name(&self) -> &str {
        "get_vocabulary_examples"
    }

    fn description(&self) -> &str {
        "Get vocabulary examples, synonyms, and usage for English words"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "word": {
                    "type": "string",
                    "description": "The English word to get examples for"
                },
                "context": {
                    "type": "string",
                    "description": "Optional context or topic for more relevant examples"
                }
            },
            "required": ["word"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let Some(word) = str_arg(&arguments, "word") else {
            return Ok("Error: No word provided.".into());
        };

        let entry = entry(word);
        let examples: Vec<&str> = entry.examples.iter().map(String::as_str).collect();
        let mut result = format!(
            "Vocabulary: {word}\n\n📖 Definition:\n{}\n\n📝 Examples:\n{}\n\n🔄 Synonyms:\n{}\n\n⚖️ Antonyms:\n{}",
            entry.definition,
            bullets(&examples),
            entry.synonyms.join(", "),
            entry.antonyms.join(", "),
        );

        if let Some(context) = str_arg(&arguments, "context") {
            result.push_str(&format!("\n\n🎯 Context: {context}"));
        }

        Ok(result)
    }
}
