use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single submitted answer. Choice questions carry the index of the
/// chosen option, text questions carry the entered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Index(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer: AnswerValue,
}

impl Answer {
    /// Flattens a submitted answer map into stored pairs, keeping the
    /// order in which the client sent them.
    pub fn from_submission(answers: IndexMap<String, AnswerValue>) -> Vec<Answer> {
        answers.into_iter().map(|(question_id, answer)| Answer { question_id, answer }).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_answer_value_from_number() {
        let value: AnswerValue = serde_json::from_str("2").unwrap();
        assert_eq!(value, AnswerValue::Index(2));
    }

    #[test]
    fn test_answer_value_from_string() {
        let value: AnswerValue = serde_json::from_str(r#""quite good""#).unwrap();
        assert_eq!(value, AnswerValue::Text("quite good".into()));
    }

    #[test]
    fn test_answer_value_rejects_other_shapes() {
        assert!(serde_json::from_str::<AnswerValue>("[0, 1]").is_err());
        assert!(serde_json::from_str::<AnswerValue>("null").is_err());
        assert!(serde_json::from_str::<AnswerValue>(r#"{"value": 1}"#).is_err());
        assert!(serde_json::from_str::<AnswerValue>("1.5").is_err());
    }

    #[test]
    fn test_from_submission_keeps_payload_order() {
        let submitted: IndexMap<String, AnswerValue> =
            serde_json::from_str(r#"{"q-b": 1, "q-a": "free text", "q-c": 0}"#).unwrap();
        let answers = Answer::from_submission(submitted);
        let ids: Vec<&str> = answers.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q-b", "q-a", "q-c"]);
    }

    #[test]
    fn test_answer_wire_shape() {
        let answer = Answer {
            question_id: "0".into(),
            answer: AnswerValue::Index(3),
        };
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["questionId"], "0");
        assert_eq!(value["answer"], 3);
    }
}
