use serde_json::{Value, json};

/// Two-question dataset offered in the override editor after a failed load.
#[must_use]
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "number": 1,
            "question": "Sample: Which breed has large litters?",
            "options": ["Landrace", "Duroc", "Hampshire", "Large White"],
            "answer": 3
        }),
        json!({
            "number": 2,
            "question": "Sample: Which is prone to PSE?",
            "options": ["Berkshire", "Chester White", "Pietrain", "Tamworth"],
            "answer": 2
        }),
    ]
}

/// `sample_records` as pretty JSON, ready to paste.
#[must_use]
pub fn sample_json() -> String {
    serde_json::to_string_pretty(&sample_records()).unwrap_or_else(|_| "[]".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::Dataset;

    #[test]
    fn sample_is_a_valid_dataset() {
        let parsed: Vec<Value> = serde_json::from_str(&sample_json()).unwrap();
        let dataset = Dataset::from_raw(&parsed).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().correct_index(), Some(2));
    }
}
