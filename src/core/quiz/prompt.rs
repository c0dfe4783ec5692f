//! Instruction pair sent to the model.

use crate::core::llm::ChatMessage;

use super::GenerationRequest;

/// Questions requested per quiz.
pub const QUESTION_COUNT: usize = 10;

pub fn system_instruction() -> String {
    format!(
        "You are a quiz generator. Generate exactly {QUESTION_COUNT} questions with exactly 4 options each. \
         Format: {{\"questions\":[{{\"question\":\"\",\"options\":[\"\",\"\",\"\",\"\"],\"correct\":0}}]}}. \
         Ensure 'correct' is 0-3. No additional text."
    )
}

pub fn user_instruction(request: &GenerationRequest) -> String {
    format!(
        "Generate {QUESTION_COUNT} multiple choice questions about {} at {} level. \
         Each question must have exactly 4 options. Keep it simple, no formatting, just raw JSON.",
        request.topic(),
        request.difficulty()
    )
}

/// System message followed by the user message.
pub fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_instruction()),
        ChatMessage::user(user_instruction(request)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quiz::Difficulty;

    #[test]
    fn system_instruction_declares_shape() {
        let s = system_instruction();
        assert!(s.contains(r#"{"questions":[{"question":"","options":["","","",""],"correct":0}]}"#));
        assert!(s.contains("exactly 10 questions"));
    }

    #[test]
    fn user_instruction_names_topic_and_level() {
        let request = GenerationRequest::new("  Rust lifetimes ", Difficulty::Advanced).unwrap();
        let s = user_instruction(&request);
        assert!(s.contains("about Rust lifetimes at advanced level"));
        assert!(s.contains("exactly 4 options"));
    }

    #[test]
    fn messages_are_system_then_user() {
        let request = GenerationRequest::new("Tides", Difficulty::Beginner).unwrap();
        let messages = build_messages(&request);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("Tides"));
    }
}
