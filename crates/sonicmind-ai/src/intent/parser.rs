use serde::Deserialize;
use sonicmind_core::intent::{rank, LabelScore};
use sonicmind_core::{AssistantError, AssistantResult};

/// Parse a zero-shot classification response into ranked label scores.
///
/// Accepts the two shapes hosted endpoints return:
/// `{"sequence": ..., "labels": [...], "scores": [...]}` and
/// `[{"label": ..., "score": ...}, ...]` (optionally nested one level deeper).
pub fn parse_classification_response(response: &str) -> AssistantResult<Vec<LabelScore>> {
    let value: serde_json::Value = serde_json::from_str(response.trim())
        .map_err(|e| AssistantError::Classifier(format!("Malformed classifier response: {e}")))?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(AssistantError::Classifier(message.to_string()));
    }

    let mut scores = if value.is_array() {
        parse_pairs(value)?
    } else {
        parse_columns(value)?
    };

    if scores.is_empty() {
        return Err(AssistantError::Classifier("Classifier returned no labels".into()));
    }

    rank(&mut scores);
    Ok(scores)
}

#[derive(Deserialize)]
struct ColumnResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

fn parse_columns(value: serde_json::Value) -> AssistantResult<Vec<LabelScore>> {
    let parsed: ColumnResponse = serde_json::from_value(value)
        .map_err(|e| AssistantError::Classifier(format!("Unexpected classifier response: {e}")))?;

    if parsed.labels.len() != parsed.scores.len() {
        return Err(AssistantError::Classifier(format!(
            "Label/score count mismatch: {} labels, {} scores",
            parsed.labels.len(),
            parsed.scores.len()
        )));
    }

    Ok(parsed
        .labels
        .into_iter()
        .zip(parsed.scores)
        .map(|(label, score)| LabelScore { label, score })
        .collect())
}

fn parse_pairs(value: serde_json::Value) -> AssistantResult<Vec<LabelScore>> {
    // Batched endpoints wrap the list once more: [[{label, score}, ...]]
    let value = match value {
        serde_json::Value::Array(mut outer)
            if outer.len() == 1 && outer[0].is_array() =>
        {
            outer.remove(0)
        }
        other => other,
    };

    serde_json::from_value(value)
        .map_err(|e| AssistantError::Classifier(format!("Unexpected classifier response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_column_response() {
        let response = r#"{"sequence": "play despacito", "labels": ["play_music", "search_web", "unknown"], "scores": [0.91, 0.06, 0.03]}"#;
        let scores = parse_classification_response(response).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].label, "play_music");
        assert!((scores[0].score - 0.91).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_pair_response_is_reranked() {
        let response = r#"[{"label": "greeting", "score": 0.2}, {"label": "tell_joke", "score": 0.7}]"#;
        let scores = parse_classification_response(response).unwrap();
        assert_eq!(scores[0].label, "tell_joke");
        assert_eq!(scores[1].label, "greeting");
    }

    #[test]
    fn parse_nested_pair_response() {
        let response = r#"[[{"label": "search_web", "score": 0.8}, {"label": "unknown", "score": 0.2}]]"#;
        let scores = parse_classification_response(response).unwrap();
        assert_eq!(scores[0].label, "search_web");
    }

    #[test]
    fn unsorted_columns_are_ranked() {
        let response = r#"{"labels": ["unknown", "greeting"], "scores": [0.1, 0.9]}"#;
        let scores = parse_classification_response(response).unwrap();
        assert_eq!(scores[0].label, "greeting");
    }

    #[test]
    fn error_payload_is_reported() {
        let response = r#"{"error": "Model typeform/distilbert-base-uncased-mnli is currently loading"}"#;
        let err = parse_classification_response(response).unwrap_err();
        assert!(err.to_string().contains("currently loading"));
    }

    #[test]
    fn mismatched_columns_fail() {
        let response = r#"{"labels": ["a", "b"], "scores": [0.5]}"#;
        assert!(parse_classification_response(response).is_err());
    }

    #[test]
    fn empty_label_list_fails() {
        assert!(parse_classification_response(r#"{"labels": [], "scores": []}"#).is_err());
        assert!(parse_classification_response("[]").is_err());
    }

    #[test]
    fn malformed_json_fails() {
        let err = parse_classification_response("<html>503</html>").unwrap_err();
        assert!(err.to_string().contains("Malformed"));
    }
}
