use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{ApiFailure, NormalizedError, TransportReason};

pub const CONNECTION_MESSAGE: &str = "unable to reach the server, check your connection";
pub const TIMEOUT_MESSAGE: &str = "the server took too long to respond, try again";
pub const FALLBACK_MESSAGE: &str = "unexpected error, try again";

// Keys searched, in order, for the per-field validation map.
const VALIDATION_KEYS: [&str; 3] = ["validationErrors", "errors", "fieldErrors"];

// Message used when the backend payload carries none.
pub fn default_message(status: Option<u16>) -> &'static str {
    match status {
        Some(400) => "invalid data submitted",
        Some(401) => "not authenticated",
        Some(403) => "not authorized for this action",
        Some(404) => "resource not found",
        Some(409) => "conflict with existing data",
        Some(422) => "invalid input data",
        Some(429) => "too many attempts, retry later",
        Some(500) => "internal server error",
        Some(502) => "server temporarily unavailable",
        Some(503) => "service temporarily unavailable",
        _ => FALLBACK_MESSAGE,
    }
}

pub fn normalize(failure: &ApiFailure) -> NormalizedError {
    match failure {
        ApiFailure::Transport { reason, .. } => {
            // No response means nothing field-specific to report.
            let message = match reason {
                TransportReason::Timeout => TIMEOUT_MESSAGE,
                TransportReason::Connect | TransportReason::Other => CONNECTION_MESSAGE,
            };
            NormalizedError {
                message: message.to_string(),
                validation_errors: None,
                status: None,
                code: None,
            }
        }
        ApiFailure::Response { status, body } => from_payload(Some(*status), body.as_ref()),
        ApiFailure::Decode { status, .. } => from_payload(Some(*status), None),
    }
}

fn from_payload(status: Option<u16>, body: Option<&Value>) -> NormalizedError {
    let message = body
        .and_then(extract_message)
        .unwrap_or_else(|| default_message(status).to_string());

    NormalizedError {
        message,
        validation_errors: body.and_then(extract_validation_errors),
        status,
        code: body.and_then(extract_code),
    }
}

// `message` first, then `error.message`.
fn extract_message(body: &Value) -> Option<String> {
    non_blank(body.get("message"))
        .or_else(|| non_blank(body.get("error").and_then(|error| error.get("message"))))
}

fn extract_code(body: &Value) -> Option<String> {
    let code = body
        .get("code")
        .or_else(|| body.get("error").and_then(|error| error.get("code")))?;
    match code {
        Value::String(code) if !code.trim().is_empty() => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

// First key holding an object wins; an empty object means no validation errors.
fn extract_validation_errors(body: &Value) -> Option<IndexMap<String, String>> {
    let fields = VALIDATION_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_object))?;

    let errors: IndexMap<String, String> = fields
        .iter()
        .filter_map(|(field, value)| field_message(value).map(|message| (field.clone(), message)))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

fn field_message(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        // Some endpoints send every rule that failed; the first one is enough.
        Value::Array(messages) => messages
            .iter()
            .find_map(Value::as_str)
            .map(str::to_string),
        other => Some(other.to_string()),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS_TABLE: [(u16, &str); 10] = [
        (400, "invalid data submitted"),
        (401, "not authenticated"),
        (403, "not authorized for this action"),
        (404, "resource not found"),
        (409, "conflict with existing data"),
        (422, "invalid input data"),
        (429, "too many attempts, retry later"),
        (500, "internal server error"),
        (502, "server temporarily unavailable"),
        (503, "service temporarily unavailable"),
    ];

    #[test]
    fn when_body_has_no_message_then_status_table_message_is_used() {
        for (status, expected) in STATUS_TABLE {
            let normalized = normalize(&ApiFailure::response(status, None));

            assert_eq!(normalized.message, expected, "status {status}");
            assert_eq!(normalized.status, Some(status));
        }
    }

    #[test]
    fn when_status_is_not_in_table_then_fallback_message_is_used() {
        let normalized = normalize(&ApiFailure::response(418, Some(json!({}))));

        assert_eq!(normalized.message, FALLBACK_MESSAGE);
        assert_eq!(default_message(None), FALLBACK_MESSAGE);
    }

    #[test]
    fn when_body_has_top_level_message_then_it_wins_over_nested_message() {
        let body = json!({
            "message": "excursion is sold out",
            "error": { "message": "nested" }
        });

        let normalized = normalize(&ApiFailure::response(409, Some(body)));

        assert_eq!(normalized.message, "excursion is sold out");
    }

    #[test]
    fn when_body_has_only_nested_message_then_nested_message_is_used() {
        let body = json!({
            "error": { "message": "seat no longer available", "code": "SEAT_TAKEN" }
        });

        let normalized = normalize(&ApiFailure::response(409, Some(body)));

        assert_eq!(normalized.message, "seat no longer available");
        assert_eq!(normalized.code.as_deref(), Some("SEAT_TAKEN"));
    }

    #[test]
    fn when_message_is_blank_then_status_default_is_used() {
        let normalized = normalize(&ApiFailure::response(404, Some(json!({ "message": "  " }))));

        assert_eq!(normalized.message, "resource not found");
    }

    #[test]
    fn when_code_is_numeric_then_it_is_rendered_as_text() {
        let normalized = normalize(&ApiFailure::response(400, Some(json!({ "code": 1042 }))));

        assert_eq!(normalized.code.as_deref(), Some("1042"));
    }

    #[test]
    fn when_validation_errors_key_is_present_then_it_takes_precedence() {
        let body = json!({
            "validationErrors": { "nomeCompleto": "obrigatório" },
            "errors": { "email": "invalid" }
        });

        let normalized = normalize(&ApiFailure::response(422, Some(body)));
        let errors = normalized.validation_errors.expect("expected validation errors");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["nomeCompleto"], "obrigatório");
    }

    #[test]
    fn when_only_errors_or_field_errors_exist_then_they_are_used_in_order() {
        let from_errors = normalize(&ApiFailure::response(
            422,
            Some(json!({ "errors": { "email": "invalid" }, "fieldErrors": { "cpf": "bad" } })),
        ));
        let from_field_errors = normalize(&ApiFailure::response(
            422,
            Some(json!({ "fieldErrors": { "cpf": "bad" } })),
        ));

        assert_eq!(
            from_errors.validation_errors.expect("expected errors map")["email"],
            "invalid"
        );
        assert_eq!(
            from_field_errors.validation_errors.expect("expected fieldErrors map")["cpf"],
            "bad"
        );
    }

    #[test]
    fn when_errors_key_is_not_an_object_then_next_key_is_tried() {
        let body = json!({
            "errors": ["something failed"],
            "fieldErrors": { "phone": "too short" }
        });

        let normalized = normalize(&ApiFailure::response(400, Some(body)));

        assert_eq!(
            normalized.validation_errors.expect("expected fieldErrors map")["phone"],
            "too short"
        );
    }

    #[test]
    fn when_validation_map_is_empty_then_validation_errors_are_absent() {
        let normalized = normalize(&ApiFailure::response(
            422,
            Some(json!({ "validationErrors": {} })),
        ));

        assert!(normalized.validation_errors.is_none());
        assert_eq!(normalized.message, "invalid input data");
    }

    #[test]
    fn when_field_value_is_list_then_first_message_is_kept_and_order_is_preserved() {
        let body = json!({
            "validationErrors": {
                "senha": ["too short", "needs a digit"],
                "email": "already registered",
                "ignored": null
            }
        });

        let errors = normalize(&ApiFailure::response(422, Some(body)))
            .validation_errors
            .expect("expected validation errors");

        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, ["senha", "email"]);
        assert_eq!(errors["senha"], "too short");
    }

    #[test]
    fn when_failure_is_transport_then_fixed_message_and_no_status() {
        let connect = normalize(&ApiFailure::transport(TransportReason::Connect, "refused"));
        let timeout = normalize(&ApiFailure::transport(TransportReason::Timeout, "elapsed"));

        assert_eq!(connect.message, CONNECTION_MESSAGE);
        assert_eq!(timeout.message, TIMEOUT_MESSAGE);
        assert_eq!(connect.status, None);
        assert!(connect.validation_errors.is_none());
    }

    #[test]
    fn when_failure_is_decode_then_fallback_message_keeps_status() {
        let normalized = normalize(&ApiFailure::Decode {
            status: 200,
            detail: "expected value".to_string(),
        });

        assert_eq!(normalized.message, FALLBACK_MESSAGE);
        assert_eq!(normalized.status, Some(200));
    }
}
