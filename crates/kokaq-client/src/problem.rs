//! Translation of HTTP failures into classified remote errors.

use kokaq_core::{RemoteError, RemoteErrorKind};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ProblemDetails {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Map a non-success status onto the facade taxonomy.
pub(crate) fn classify_status(status: StatusCode) -> RemoteErrorKind {
    match status {
        StatusCode::NOT_FOUND => RemoteErrorKind::NotFound,
        StatusCode::CONFLICT | StatusCode::LOCKED => RemoteErrorKind::Conflict,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RemoteErrorKind::Validation,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            RemoteErrorKind::Unavailable
        }
        _ => RemoteErrorKind::Protocol,
    }
}

/// Classify an HTTP response into a remote error, consuming its body.
pub(crate) async fn classify_problem(response: Response) -> RemoteError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    problem_error(status, &bytes)
}

fn problem_error(status: StatusCode, body: &[u8]) -> RemoteError {
    let problem = serde_json::from_slice::<ProblemDetails>(body).ok();
    let body_text = String::from_utf8_lossy(body).trim().to_string();

    let message = problem
        .and_then(|p| p.detail.or(p.title))
        .filter(|text| !text.trim().is_empty())
        .or_else(|| (!body_text.is_empty()).then_some(body_text))
        .unwrap_or_else(|| format!("request failed with status {status}"));

    RemoteError::new(classify_status(status), message)
}

/// Classify a transport-level failure.
pub(crate) fn transport_error(operation: &str, err: &reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::protocol(format!("{operation}: undecodable response: {err}"))
    } else if err.is_timeout() {
        RemoteError::connection(format!("{operation}: request timed out"))
    } else {
        RemoteError::connection(format!("{operation}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_kinds() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            RemoteErrorKind::NotFound
        );
        assert_eq!(
            classify_status(StatusCode::CONFLICT),
            RemoteErrorKind::Conflict
        );
        assert_eq!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY),
            RemoteErrorKind::Validation
        );
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            RemoteErrorKind::Unavailable
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            RemoteErrorKind::Protocol
        );
    }

    #[test]
    fn detail_wins_over_title() {
        let err = problem_error(
            StatusCode::NOT_FOUND,
            br#"{"title":"not found","detail":"queue 'orders' does not exist"}"#,
        );
        assert_eq!(err.message, "queue 'orders' does not exist");
    }

    #[test]
    fn falls_back_to_title_then_body_then_status() {
        let titled = problem_error(StatusCode::CONFLICT, br#"{"title":"already exists"}"#);
        assert_eq!(titled.message, "already exists");

        let plain = problem_error(StatusCode::BAD_REQUEST, b"  bad priority \n");
        assert_eq!(plain.message, "bad priority");

        let empty = problem_error(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(empty.message, "request failed with status 502 Bad Gateway");
        assert_eq!(empty.kind, RemoteErrorKind::Unavailable);
    }
}
