//! Common mistakes tool — typical learner errors with corrections.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::Tool;

use crate::{capitalize, str_arg};

struct Mistake {
    mistake: &'static str,
    correct: &'static str,
    explanation: &'static str,
}

const fn m(mistake: &'static str, correct: &'static str, explanation: &'static str) -> Mistake {
    Mistake { mistake, correct, explanation }
}

const GRAMMAR: &[Mistake] = &[
    m("I am going to home", "I am going home", "Don't use 'to' before 'home' - it's an adverb, not a noun"),
    m("I have 20 years old", "I am 20 years old", "Use 'am' with age, not 'have'"),
    m("I am agree with you", "I agree with you", "Don't use 'am' with 'agree' - it's a verb, not an adjective"),
];

const GRAMMAR_VIETNAMESE: &[Mistake] = &[
    m("I very like this movie", "I really like this movie", "Use 'really' instead of 'very' before verbs"),
    m("I am study English", "I am studying English", "Use present continuous (-ing) for current actions"),
];

const VOCABULARY: &[Mistake] = &[
    m("I am boring", "I am bored", "Use '-ed' for feelings, '-ing' for things that cause feelings"),
    m("I lost my phone yesterday", "I lost my phone yesterday", "This is actually correct! 'Lost' is the past tense of 'lose'"),
];

const PRONUNCIATION: &[Mistake] = &[
    m("pronouncing 'th' as 't' or 'd'", "th sound (tongue between teeth)", "Practice putting your tongue between your teeth for 'th' sounds"),
    m("not stressing the right syllable", "stress the correct syllable", "English is a stress-timed language - syllable stress is crucial"),
];

const IDIOMS: &[Mistake] = &[
    m("I am agree with you", "I agree with you", "This is a common mistake - 'agree' is a verb, not an adjective"),
    m("I am going to home", "I am going home", "Don't use 'to' before 'home' - it's an adverb"),
];

/// General mistakes for a category; unknown categories use grammar.
fn general(category: &str) -> &'static [Mistake] {
    match category {
        "vocabulary" => VOCABULARY,
        "pronunciation" => PRONUNCIATION,
        "idioms" => IDIOMS,
        _ => GRAMMAR,
    }
}

fn language_specific(category: &str, native_language: &str) -> &'static [Mistake] {
    match (category, native_language) {
        ("grammar", "vietnamese") => GRAMMAR_VIETNAMESE,
        _ => &[],
    }
}

pub struct CommonMistakesTool;

#[async_trait]
impl Tool for CommonMistakesTool {
    fn name(&self) -> &str {
        "get_common_mistakes"
    }

    fn description(&self) -> &str {
        "Get common English mistakes and how to avoid them"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["grammar", "vocabulary", "pronunciation", "idioms"],
                    "description": "Category of mistakes to focus on",
                    "default": "grammar"
                },
                "native_language": {
                    "type": "string",
                    "description": "The learner's native language to provide specific advice"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let category = str_arg(&arguments, "category").unwrap_or("grammar");
        let native_language = str_arg(&arguments, "native_language");

        // Language-specific entries come first, on top of the general list.
        let data_category = match category {
            "vocabulary" | "pronunciation" | "idioms" => category,
            _ => "grammar",
        };
        let specific = native_language
            .map(|lang| language_specific(data_category, &lang.to_lowercase()))
            .unwrap_or(&[]);
        let mistakes = specific.iter().chain(general(data_category));

        let mut result = format!("Common {} Mistakes", capitalize(category));
        if let Some(lang) = native_language {
            result.push_str(&format!(" (for {lang} speakers)"));
        }

        let items: Vec<String> = mistakes
            .enumerate()
            .map(|(i, m)| {
                format!(
                    "{}. ❌ {}\n   ✅ {}\n   💡 {}",
                    i + 1,
                    m.mistake,
                    m.correct,
                    m.explanation
                )
            })
            .collect();
        result.push_str(&format!(":\n\n{}", items.join("\n\n")));

        Ok(result)
    }
}
