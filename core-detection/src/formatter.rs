//! Raw payload normalization
//!
//! The service reports results in a loose JSON shape. Everything leaving this
//! module uses the domain vocabulary: `FAKE` is spelled `MANIPULATED`,
//! scores are fractions, and models that did not contribute are dropped.

use serde_json::{Map, Value};

use crate::error::{DetectionError, Result};
use crate::types::{status, DetectionResult, DetectionResultList, ModelResult};

const UNKNOWN_NAME: &str = "Unknown";

/// Normalize one raw job payload.
///
/// A payload without a `resultsSummary` describes a job that has not been
/// analyzed yet and yields [`DetectionResult::unknown`].
///
/// # Errors
///
/// `unknown_error` if the payload is not a JSON object.
pub fn format_result(raw: &Value) -> Result<DetectionResult> {
    let body = raw.as_object().ok_or_else(|| {
        DetectionError::unknown(format!("Unexpected result payload: {}", raw))
    })?;

    let request_id = body
        .get("requestId")
        .and_then(Value::as_str)
        .unwrap_or(status::UNKNOWN)
        .to_string();

    let summary = match body.get("resultsSummary").and_then(Value::as_object) {
        Some(summary) => summary,
        None => return Ok(DetectionResult::unknown(request_id)),
    };

    let score = summary
        .get("metadata")
        .and_then(|metadata| metadata.get("finalScore"))
        .and_then(coerce_number)
        .map(|raw_score| raw_score / 100.0);

    let models = body
        .get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(Value::as_object)
                .filter_map(format_model)
                .collect()
        })
        .unwrap_or_default();

    Ok(DetectionResult {
        request_id,
        status: normalize_status(status_of(summary)),
        score,
        models,
    })
}

/// Normalize one page of results.
///
/// # Errors
///
/// `server_error` if any page counter or the `mediaList` array is missing,
/// or if an entry of `mediaList` is not an object. No partial list is produced.
pub fn format_result_list(raw: &Value) -> Result<DetectionResultList> {
    let invalid = || DetectionError::server_error("Invalid response from server");

    let counter = |key: &str| raw.get(key).and_then(Value::as_u64).ok_or_else(invalid);

    let total_items = counter("totalItems")?;
    let total_pages = counter("totalPages")?;
    let current_page = counter("currentPage")?;
    let current_page_items_count = counter("currentPageItemsCount")?;

    let items = raw
        .get("mediaList")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?
        .iter()
        .map(|item| format_result(item).map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    Ok(DetectionResultList {
        total_items,
        total_pages,
        current_page,
        current_page_items_count,
        items,
    })
}

fn format_model(model: &Map<String, Value>) -> Option<ModelResult> {
    let raw_status = status_of(model);
    if raw_status == status::NOT_APPLICABLE {
        return None;
    }

    Some(ModelResult {
        name: model
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_NAME)
            .to_string(),
        status: normalize_status(raw_status),
        score: model.get("predictionNumber").and_then(Value::as_f64),
    })
}

fn status_of(entry: &Map<String, Value>) -> &str {
    entry
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or(status::UNKNOWN)
}

fn normalize_status(raw: &str) -> String {
    if raw == status::FAKE {
        status::MANIPULATED.to_string()
    } else {
        raw.to_string()
    }
}

/// Numbers and numeric strings; anything else is no score.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("score present");
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_format_full_payload() {
        let raw = json!({
            "requestId": "req-42",
            "resultsSummary": {
                "status": "FAKE",
                "metadata": { "finalScore": 87 }
            },
            "models": [
                { "name": "face-swap", "status": "FAKE", "predictionNumber": 0.91 },
                { "name": "lip-sync", "status": "AUTHENTIC", "predictionNumber": "n/a" },
                { "name": "voice", "status": "NOT_APPLICABLE", "predictionNumber": 0.1 },
                { "status": "ANALYZING" }
            ]
        });

        let result = format_result(&raw).unwrap();
        assert_eq!(result.request_id, "req-42");
        assert_eq!(result.status, "MANIPULATED");
        assert_close(result.score, 0.87);

        assert_eq!(
            result.models,
            vec![
                ModelResult {
                    name: "face-swap".to_string(),
                    status: "MANIPULATED".to_string(),
                    score: Some(0.91),
                },
                ModelResult {
                    name: "lip-sync".to_string(),
                    status: "AUTHENTIC".to_string(),
                    score: None,
                },
                ModelResult {
                    name: "Unknown".to_string(),
                    status: "ANALYZING".to_string(),
                    score: None,
                },
            ]
        );
    }

    #[test]
    fn test_missing_summary_is_unknown() {
        let result = format_result(&json!({"requestId": "req-1"})).unwrap();
        assert_eq!(result, DetectionResult::unknown("req-1"));

        let result = format_result(&json!({"resultsSummary": null})).unwrap();
        assert_eq!(result.request_id, "UNKNOWN");
        assert_eq!(result.status, "UNKNOWN");
    }

    #[test]
    fn test_formatted_shape_reformats_to_unknown() {
        let formatted = json!({
            "requestId": "req-1",
            "status": "AUTHENTIC",
            "score": 0.5,
            "models": []
        });
        let result = format_result(&formatted).unwrap();
        assert_eq!(result.status, "UNKNOWN");
        assert_eq!(result.score, None);
        assert!(result.models.is_empty());
    }

    #[test]
    fn test_score_coercion() {
        let with_score = |score: Value| {
            format_result(&json!({
                "requestId": "r",
                "resultsSummary": { "status": "AUTHENTIC", "metadata": { "finalScore": score } }
            }))
            .unwrap()
            .score
        };

        assert_close(with_score(json!(87)), 0.87);
        assert_close(with_score(json!("42.5")), 0.425);
        assert_eq!(with_score(json!("n/a")), None);
        assert_eq!(with_score(json!(null)), None);
        assert_eq!(with_score(json!({"value": 1})), None);

        let no_metadata = format_result(&json!({
            "requestId": "r",
            "resultsSummary": { "status": "AUTHENTIC" }
        }))
        .unwrap();
        assert_eq!(no_metadata.score, None);
        assert_eq!(no_metadata.status, "AUTHENTIC");
    }

    #[test]
    fn test_non_object_payload() {
        let error = format_result(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnknownError);
    }

    fn list_payload() -> Value {
        json!({
            "totalItems": 12,
            "totalPages": 2,
            "currentPage": 0,
            "currentPageItemsCount": 2,
            "mediaList": [
                {
                    "requestId": "a",
                    "resultsSummary": { "status": "FAKE", "metadata": { "finalScore": 99 } },
                    "models": []
                },
                { "requestId": "b" }
            ]
        })
    }

    #[test]
    fn test_format_result_list() {
        let list = format_result_list(&list_payload()).unwrap();
        assert_eq!(list.total_items, 12);
        assert_eq!(list.total_pages, 2);
        assert_eq!(list.current_page, 0);
        assert_eq!(list.current_page_items_count, 2);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].status, "MANIPULATED");
        assert_eq!(list.items[1].status, "UNKNOWN");
    }

    #[test]
    fn test_format_result_list_requires_every_counter() {
        for key in [
            "totalItems",
            "totalPages",
            "currentPage",
            "currentPageItemsCount",
            "mediaList",
        ] {
            let mut raw = list_payload();
            raw.as_object_mut().unwrap().remove(key);

            let error = format_result_list(&raw).unwrap_err();
            assert_eq!(error.kind, ErrorKind::ServerError, "missing {}", key);
            assert_eq!(error.message, "Invalid response from server");
        }
    }

    #[test]
    fn test_format_result_list_rejects_non_object_entry() {
        let mut raw = list_payload();
        raw["mediaList"] = json!([{ "requestId": "a" }, "garbage"]);

        let error = format_result_list(&raw).unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServerError);
        assert_eq!(error.message, "Invalid response from server");
    }

    #[test]
    fn test_format_result_list_rejects_non_integer_counter() {
        let mut raw = list_payload();
        raw["totalPages"] = json!("two");
        assert_eq!(
            format_result_list(&raw).unwrap_err().kind,
            ErrorKind::ServerError
        );
    }
}
