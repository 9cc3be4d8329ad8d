use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as Jsonb;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Single choice.
    Radio,
    /// Multiple choice.
    Checkbox,
    /// Free text, no options.
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(rename = "type")]
    pub type_: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: i32,
    pub title: String,
    pub questions: Jsonb<Vec<Question>>,
    pub created_by: i32,
    pub response_count: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_question_type_wire_names() {
        let question: Question = serde_json::from_str(r#"{"text": "How was it?", "type": "radio", "options": ["good", "bad"]}"#).unwrap();
        assert_eq!(question.type_, QuestionType::Radio);
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "radio");
    }

    #[test]
    fn test_options_default_to_empty() {
        let question: Question = serde_json::from_str(r#"{"text": "Any comments?", "type": "text"}"#).unwrap();
        assert!(question.options.is_empty());
    }

    #[test]
    fn test_unknown_question_type_rejected() {
        let parsed: Result<Question, _> = serde_json::from_str(r#"{"text": "Scale of 1-10?", "type": "slider"}"#);
        assert!(parsed.is_err());
    }
}
