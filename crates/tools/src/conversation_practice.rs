//! Conversation practice tool — role-play dialogues and discussion prompts.

use async_trait::async_trait;
use parley_core::error::ToolError;
use parley_core::tool::Tool;

use crate::{bullets, str_arg};

struct Scenario {
    level: &'static str,
    kind: &'static str,
    title: &'static str,
    roles: &'static [&'static str],
    dialogue: &'static [&'static str],
    vocabulary: &'static [&'static str],
    questions: &'static [&'static str],
}

const TRAVEL: &[Scenario] = &[
    Scenario {
        level: "beginner",
        kind: "roleplay",
        title: "At the Airport",
        roles: &["Traveler", "Airport Staff"],
        dialogue: &[
            "Traveler: Excuse me, where is the check-in counter?",
            "Staff: It's on the second floor, near gate 5.",
            "Traveler: Thank you. What time does my flight leave?",
            "Staff: Your flight leaves at 2:30 PM. Please arrive 2 hours early.",
        ],
        vocabulary: &["check-in", "counter", "gate", "flight", "arrive"],
        questions: &[],
    },
    Scenario {
        level: "beginner",
        kind: "discussion",
        title: "Travel Preferences",
        roles: &[],
        dialogue: &[],
        vocabulary: &[],
        questions: &[
            "Do you prefer traveling alone or with others?",
            "What's your favorite way to travel?",
            "Where would you like to go on your next trip?",
        ],
    },
    Scenario {
        level: "intermediate",
        kind: "roleplay",
        title: "Hotel Booking",
        roles: &["Guest", "Hotel Receptionist"],
        dialogue: &[
            "Guest: Hi, I'd like to book a room for next weekend.",
            "Receptionist: Of course! How many nights and what type of room?",
            "Guest: Two nights, and I'd prefer a room with a view.",
            "Receptionist: We have a deluxe room with ocean view available.",
        ],
        vocabulary: &["book", "deluxe", "ocean view", "available", "prefer"],
        questions: &[],
    },
];

const FOOD: &[Scenario] = &[Scenario {
    level: "beginner",
    kind: "roleplay",
    title: "At a Restaurant",
    roles: &["Customer", "Waiter"],
    dialogue: &[
        "Customer: Can I see the menu, please?",
        "Waiter: Here you are. Today's special is grilled salmon.",
        "Customer: That sounds good. I'll have that.",
        "Waiter: Excellent choice. Would you like something to drink?",
    ],
    vocabulary: &["menu", "special", "grilled", "salmon", "choice"],
    questions: &[],
}];

const WORK: &[Scenario] = &[Scenario {
    level: "intermediate",
    kind: "roleplay",
    title: "Job Interview",
    roles: &["Interviewer", "Candidate"],
    dialogue: &[
        "Interviewer: Tell me about your previous work experience.",
        "Candidate: I worked as a software developer for 3 years.",
        "Interviewer: What are your strengths and weaknesses?",
        "Candidate: I'm detail-oriented and sometimes spend too much time perfecting things.",
    ],
    vocabulary: &["experience", "developer", "strengths", "weaknesses", "detail-oriented"],
    questions: &[],
}];

/// Unknown topics practice travel.
fn scenarios(topic: &str) -> &'static [Scenario] {
    match topic {
        "food" => FOOD,
        "work" => WORK,
        _ => TRAVEL,
    }
}

/// Resolve level (requested, then intermediate, then beginner) and then
/// kind (requested, then roleplay) within that level.
fn select(topic: &str, level: &str, kind: &str) -> Option<&'static Scenario> {
    let all = scenarios(topic);
    let level = [level, "intermediate", "beginner"]
        .into_iter()
        .find(|l| all.iter().any(|s| s.level == *l))?;
    let at_level = || all.iter().filter(move |s| s.level == level);

    at_level()
        .find(|s| s.kind == kind)
        .or_else(|| at_level().find(|s| s.kind == "roleplay"))
}

pub struct ConversationPracticeTool;

#[async_trait]
impl Tool for ConversationPracticeTool {
    fn name(&self) -> &str {
        "get_conversation_practice"
    }

    fn description(&self) -> &str {
        "Generate conversation practice scenarios for English learning"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The conversation topic (e.g., 'travel', 'food', 'work')"
                },
                "level": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"],
                    "description": "The learner's level",
                    "default": "intermediate"
                },
                "scenario_type": {
                    "type": "string",
                    "enum": ["roleplay", "discussion", "interview"],
                    "description": "Type of conversation practice",
                    "default": "roleplay"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let Some(topic) = str_arg(&arguments, "topic") else {
            return Ok("Error: No topic provided.".into());
        };
        let level = str_arg(&arguments, "level").unwrap_or("intermediate");
        let kind = str_arg(&arguments, "scenario_type").unwrap_or("roleplay");

        let Some(scenario) = select(&topic.to_lowercase(), level, kind) else {
            return Ok(format!(
                "Conversation Practice: {topic} ({level} level, {kind})\n\nThis scenario would provide conversation practice for {topic} at {level} level using {kind} format."
            ));
        };

        let mut result = format!(
            "Conversation Practice: {}\n\n🎭 Scenario: {kind}\n📊 Level: {level}\n👥 Roles: {}\n\n💬 Dialogue:\n{}",
            scenario.title,
            scenario.roles.join(" & "),
            bullets(scenario.dialogue),
        );

        if !scenario.vocabulary.is_empty() {
            result.push_str(&format!("\n\n📚 Key Vocabulary:\n{}", scenario.vocabulary.join(", ")));
        }

        if !scenario.questions.is_empty() {
            result.push_str(&format!(
                "\n\n❓ Discussion Questions:\n{}",
                bullets(scenario.questions)
            ));
        }

        Ok(result)
    }
}
