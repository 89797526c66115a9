//! Grammar explanation tool — leveled notes for a few common topics.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::Tool;

use crate::{bullets, capitalize, str_arg};

struct Lesson {
    level: &'static str,
    explanation: &'static str,
    examples: &'static [&'static str],
    formula: &'static str,
}

const PAST_PERFECT: &[Lesson] = &[
    Lesson {
        level: "beginner",
        explanation: "The past perfect is used to show that one action happened before another action in the past.",
        examples: &[
            "I had finished my homework before I went to bed.",
            "She had already eaten when I arrived.",
        ],
        formula: "Subject + had + past participle",
    },
    Lesson {
        level: "intermediate",
        explanation: "The past perfect (had + past participle) indicates that an action was completed before another past action or time.",
        examples: &[
            "By the time I got home, my sister had already cooked dinner.",
            "I had never seen such a beautiful sunset before that day.",
        ],
        formula: "Subject + had + past participle + before/when/by the time + past simple",
    },
    Lesson {
        level: "advanced",
        explanation: "The past perfect can also be used in reported speech, conditional sentences, and to express unreal past situations.",
        examples: &[
            "He said he had been working there for five years.",
            "If I had known about the meeting, I would have attended.",
        ],
        formula: "Various uses: reported speech, conditionals, unreal past",
    },
];

const CONDITIONALS: &[Lesson] = &[
    Lesson {
        level: "beginner",
        explanation: "Conditionals are sentences that express 'if' situations.",
        examples: &[
            "If it rains, I will stay home.",
            "If I were rich, I would travel the world.",
        ],
        formula: "If + present simple, will + base form (Type 1)\nIf + past simple, would + base form (Type 2)",
    },
    Lesson {
        level: "intermediate",
        explanation: "There are four main types of conditionals, each expressing different degrees of possibility and time.",
        examples: &[
            "If it rains tomorrow, I'll take an umbrella. (Type 1 - real possibility)",
            "If I won the lottery, I would buy a house. (Type 2 - unlikely)",
            "If I had studied harder, I would have passed the exam. (Type 3 - past)",
        ],
        formula: "Type 1: If + present, will + base\nType 2: If + past, would + base\nType 3: If + past perfect, would have + past participle",
    },
    Lesson {
        level: "advanced",
        explanation: "Mixed conditionals combine different time references and can express complex hypothetical situations.",
        examples: &[
            "If I had studied medicine, I would be a doctor now.",
            "If I were you, I would have accepted the job offer.",
        ],
        formula: "Mixed: If + past perfect, would + base form (past condition, present result)",
    },
];

const PHRASAL_VERBS: &[Lesson] = &[
    Lesson {
        level: "beginner",
        explanation: "Phrasal verbs are verbs combined with prepositions or adverbs that change the meaning.",
        examples: &["Look up = search for information", "Give up = stop trying"],
        formula: "Verb + preposition/adverb = new meaning",
    },
    Lesson {
        level: "intermediate",
        explanation: "Phrasal verbs can be separable or inseparable, and some can have multiple meanings.",
        examples: &[
            "I'll look up the word in the dictionary. (separable)",
            "We need to put up with the noise. (inseparable)",
            "The plane took off on time. (literal and figurative meanings)",
        ],
        formula: "Separable: verb + object + particle OR verb + particle + object\nInseparable: verb + particle + object only",
    },
    Lesson {
        level: "advanced",
        explanation: "Phrasal verbs are essential for natural English and often replace formal single-word verbs.",
        examples: &[
            "The meeting was called off due to bad weather. (cancelled)",
            "She came up with a brilliant idea. (thought of)",
            "We need to catch up on the latest news. (get updated)",
        ],
        formula: "Often replace formal verbs: call off = cancel, come up with = think of, catch up = get updated",
    },
];

fn lessons(topic: &str) -> Option<&'static [Lesson]> {
    match topic {
        "past perfect" => Some(PAST_PERFECT),
        "conditionals" => Some(CONDITIONALS),
        "phrasal verbs" => Some(PHRASAL_VERBS),
        _ => None,
    }
}

/// The lesson for `level`, falling back to intermediate.
fn lesson(topic: &str, level: &str) -> Option<&'static Lesson> {
    let lessons = lessons(topic)?;
    lessons
        .iter()
        .find(|l| l.level == level)
        .or_else(|| lessons.iter().find(|l| l.level == "intermediate"))
}

pub struct GrammarExplanationTool;

#[async_trait]
impl Tool for GrammarExplanationTool {
    fn name(&self) -> &str {
        "get_grammar_explanation"
    }

    fn description(&self) -> &str {
        "Get detailed grammar explanations and examples for English learning"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "grammar_topic": {
                    "type": "string",
                    "description": "The grammar topic to explain (e.g., 'past perfect', 'conditionals', 'phrasal verbs')"
                },
                "level": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"],
                    "description": "The learner's level",
                    "default": "intermediate"
                }
            },
            "required": ["grammar_topic"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let Some(topic) = str_arg(&arguments, "grammar_topic") else {
            return Ok("Error: No grammar topic provided.".into());
        };
        let level = str_arg(&arguments, "level").unwrap_or("intermediate");

        let Some(lesson) = lesson(&topic.to_lowercase(), level) else {
            return Ok(format!(
                "Grammar explanation for \"{topic}\" ({level} level):\n\nThis grammar topic would be explained with examples and rules appropriate for {level} level learners."
            ));
        };

        Ok(format!(
            "Grammar: {} ({level} level)\n\n📚 Explanation:\n{}\n\n📝 Examples:\n{}\n\n📋 Formula:\n{}",
            capitalize(topic),
            lesson.explanation,
            bullets(lesson.examples),
            lesson.formula,
        ))
    }
}
