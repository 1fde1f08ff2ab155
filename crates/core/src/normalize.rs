//! Turns loosely shaped dataset records into validated questions.
//!
//! Accepted record shape (every field optional):
//!
//! ```json
//! { "number": 3, "question": "...", "options": ["..", ".."], "answer": 1 }
//! { "question": "...", "A": "..", "B": "..", "C": "..", "D": "..", "correct_index": 2 }
//! ```
//!
//! Records that end up without question text or with fewer than two options
//! are dropped. Survivors keep their relative order.

use serde_json::{Map, Value};

use crate::model::{AnswerKey, Question};

const LEGACY_OPTION_FIELDS: [&str; 4] = ["A", "B", "C", "D"];

/// Normalize raw records, discarding the ones that cannot form a question.
#[must_use]
pub fn normalize(records: &[Value]) -> Vec<Question> {
    records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| normalize_record(position, record))
        .collect()
}

fn normalize_record(position: usize, record: &Value) -> Option<Question> {
    let Some(fields) = record.as_object() else {
        log::debug!("record {position}: not an object, skipped");
        return None;
    };

    let number = display_number(fields)
        .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX));
    let text = fields
        .get("question")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let options = options(fields)?;
    let answer = numeric_key(fields.get("answer"))
        .or_else(|| numeric_key(fields.get("correct_index")))
        .unwrap_or(AnswerKey::Index(0));

    match Question::new(number, text, options, answer) {
        Ok(question) => Some(question),
        Err(err) => {
            log::debug!("record {position}: {err}, skipped");
            None
        }
    }
}

fn display_number(fields: &Map<String, Value>) -> Option<u32> {
    match fields.get("number")? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `options` wins when it is a non-empty-ish array; otherwise the legacy
/// single-letter fields are collected. A truthy non-array `options` value
/// cannot be used and drops the record.
fn options(fields: &Map<String, Value>) -> Option<Vec<String>> {
    match fields.get("options") {
        Some(value) if is_truthy(value) => value
            .as_array()
            .map(|items| items.iter().map(option_text).collect()),
        _ => Some(
            LEGACY_OPTION_FIELDS
                .iter()
                .filter_map(|key| fields.get(*key))
                .filter(|value| is_truthy(value))
                .map(option_text)
                .collect(),
        ),
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Any JSON number yields a key. Numbers that are not a whole index map to
/// `-1`, which never matches an option.
fn numeric_key(value: Option<&Value>) -> Option<AnswerKey> {
    let Value::Number(n) = value? else {
        return None;
    };
    if let Some(v) = n.as_i64() {
        return Some(AnswerKey::Index(v));
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    #[allow(clippy::cast_possible_truncation)]
    let index = if f.fract() == 0.0 && f.abs() < 9.0e15 {
        f as i64
    } else {
        -1
    };
    Some(AnswerKey::Index(index))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_invalid_records_and_keeps_order() {
        let raw = vec![
            json!({"question": "First", "options": ["a", "b"], "answer": 0}),
            json!({"question": "   ", "options": ["a", "b"]}),
            json!({"question": "Too few", "options": ["only"]}),
            json!({"question": "Second", "options": ["a", "b", "c"], "answer": 2}),
            json!({"options": ["a", "b"]}),
            json!("not a record"),
            json!({"question": "Third", "A": "x", "B": "y"}),
        ];

        let out = normalize(&raw);
        let texts: Vec<&str> = out.iter().map(Question::text).collect();

        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn number_defaults_to_source_position() {
        let raw = vec![
            json!({"question": "skipped", "options": []}),
            json!({"question": "Q", "options": ["a", "b"]}),
            json!({"number": 42, "question": "Q", "options": ["a", "b"]}),
            json!({"number": "7", "question": "Q", "options": ["a", "b"]}),
        ];

        let numbers: Vec<u32> = normalize(&raw).iter().map(Question::number).collect();

        assert_eq!(numbers, vec![2, 42, 7]);
    }

    #[test]
    fn legacy_letter_fields_drop_falsy_entries() {
        let raw = vec![json!({
            "question": "Legacy",
            "A": "Landrace",
            "B": "",
            "C": null,
            "D": "Duroc",
            "correct_index": 1
        })];

        let out = normalize(&raw);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].options(), ["Landrace", "Duroc"]);
        assert_eq!(out[0].correct_index(), Some(1));
    }

    #[test]
    fn falsy_options_fall_back_to_letters() {
        let raw = vec![
            json!({"question": "Q", "options": null, "A": "a", "B": "b"}),
            json!({"question": "Q", "options": false, "A": "a", "B": "b"}),
        ];
        assert_eq!(normalize(&raw).len(), 2);
    }

    #[test]
    fn truthy_non_array_options_drop_the_record() {
        let raw = vec![json!({"question": "Q", "options": {"a": 1}, "A": "a", "B": "b"})];
        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn answer_prefers_numeric_answer_then_correct_index() {
        let raw = vec![
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": 2, "correct_index": 1}),
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": "b", "correct_index": 1}),
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": "c"}),
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": 1.0}),
        ];

        let resolved: Vec<Option<usize>> =
            normalize(&raw).iter().map(Question::correct_index).collect();

        assert_eq!(resolved, vec![Some(2), Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn fractional_answer_wins_but_marks_nothing_correct() {
        let raw = vec![
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": 2.5, "correct_index": 1}),
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": 1.5}),
            json!({"question": "Q", "options": ["a", "b", "c"], "correct_index": 0.5}),
            json!({"question": "Q", "options": ["a", "b", "c"], "answer": 1.0e300}),
        ];

        let resolved: Vec<Option<usize>> =
            normalize(&raw).iter().map(Question::correct_index).collect();

        assert_eq!(resolved, vec![None, None, None, None]);
        assert_eq!(normalize(&raw)[0].answer(), &AnswerKey::Index(-1));
    }

    #[test]
    fn unusable_number_field_falls_back_to_position() {
        let raw = vec![
            json!({"number": -3, "question": "Q", "options": ["a", "b"]}),
            json!({"number": 1.5, "question": "Q", "options": ["a", "b"]}),
            json!({"number": "x", "question": "Q", "options": ["a", "b"]}),
        ];

        let numbers: Vec<u32> = normalize(&raw).iter().map(Question::number).collect();

        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn non_string_options_render_as_text() {
        let raw = vec![json!({"question": "Pick", "options": [1, true, "three"]})];
        assert_eq!(normalize(&raw)[0].options(), ["1", "true", "three"]);
    }

    #[test]
    fn non_string_question_is_treated_as_empty() {
        let raw = vec![json!({"question": 12, "options": ["a", "b"]})];
        assert!(normalize(&raw).is_empty());
    }
}
