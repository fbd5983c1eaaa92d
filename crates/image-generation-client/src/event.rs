//! Status records of the streamed generation response.
//!
//! Each line is a JSON object such as `{"status":"WAITING","queue_position":3}` or
//! `{"status":"SUCCESS","image_url":"https://..."}`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Still queued; position if the server reported one.
    Waiting { queue_position: Option<u64> },
    /// Generation finished.
    Success { image_url: String },
    /// The server gave up on the request.
    Failure { reason: Option<String> },
    /// Any other status (e.g. `PROCESSING`).
    Unrecognized { status: String },
}

impl GenerationEvent {
    /// Decodes one line. Returns `None` for blank lines, invalid JSON, non-objects, records
    /// without a string `status`, and `SUCCESS` records that carry no `image_url`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let line = line.strip_prefix("data:").map(str::trim_start).unwrap_or(line);
        if line.is_empty() {
            return None;
        }

        let value: Value = serde_json::from_str(line).ok()?;
        let record = value.as_object()?;
        let status = record.get("status")?.as_str()?;

        let event = match status {
            "SUCCESS" => Self::Success {
                image_url: record.get("image_url")?.as_str()?.to_string(),
            },
            "WAITING" => Self::Waiting {
                queue_position: record.get("queue_position").and_then(queue_position),
            },
            "FAILURE" | "ERROR" => Self::Failure {
                reason: ["error", "message", "detail"]
                    .iter()
                    .find_map(|key| record.get(*key).and_then(Value::as_str))
                    .map(str::to_string),
            },
            other => Self::Unrecognized {
                status: other.to_string(),
            },
        };
        Some(event)
    }
}

fn queue_position(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_waiting() {
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"WAITING","queue_position":2}"#),
            Some(GenerationEvent::Waiting {
                queue_position: Some(2)
            })
        );
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"WAITING","queue_position":"7"}"#),
            Some(GenerationEvent::Waiting {
                queue_position: Some(7)
            })
        );
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"WAITING"}"#),
            Some(GenerationEvent::Waiting {
                queue_position: None
            })
        );
    }

    #[test]
    fn test_parse_success() {
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"SUCCESS","image_url":"https://x/y.png","nsfw":false}"#),
            Some(GenerationEvent::Success {
                image_url: "https://x/y.png".to_string()
            })
        );
    }

    #[test]
    fn test_parse_success_without_url_is_skipped() {
        assert_eq!(GenerationEvent::parse_line(r#"{"status":"SUCCESS"}"#), None);
        assert_eq!(GenerationEvent::parse_line(r#"{"status":"SUCCESS","image_url":null}"#), None);
    }

    #[test]
    fn test_parse_failure_with_reason() {
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"FAILURE","error":"nsfw prompt"}"#),
            Some(GenerationEvent::Failure {
                reason: Some("nsfw prompt".to_string())
            })
        );
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"ERROR"}"#),
            Some(GenerationEvent::Failure { reason: None })
        );
    }

    #[test]
    fn test_parse_other_status() {
        assert_eq!(
            GenerationEvent::parse_line(r#"{"status":"PROCESSING","progress":0.5}"#),
            Some(GenerationEvent::Unrecognized {
                status: "PROCESSING".to_string()
            })
        );
    }

    #[test]
    fn test_parse_sse_prefix() {
        assert_eq!(
            GenerationEvent::parse_line(r#"data: {"status":"SUCCESS","image_url":"u"}"#),
            Some(GenerationEvent::Success {
                image_url: "u".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(GenerationEvent::parse_line(""), None);
        assert_eq!(GenerationEvent::parse_line("   "), None);
        assert_eq!(GenerationEvent::parse_line("not json"), None);
        // Single-quoted, capitalised literals are not JSON.
        assert_eq!(GenerationEvent::parse_line("{'status': 'SUCCESS', 'ok': True}"), None);
        assert_eq!(GenerationEvent::parse_line("[1,2,3]"), None);
        assert_eq!(GenerationEvent::parse_line(r#"{"queue_position":1}"#), None);
        assert_eq!(GenerationEvent::parse_line(r#"{"status":5}"#), None);
    }
}
