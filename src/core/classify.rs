use crate::domain::model::{ProbeStatus, TransportFailure};
use crate::domain::ports::{FetchResponse, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: ProbeStatus,
    pub http_status: Option<u16>,
    pub failure: Option<TransportFailure>,
    pub reason: String,
}

/// Maps one probe outcome to a status.
///
/// - transport failure: `Error`
/// - no marker: 2xx is `Found`, anything else `NotFound`
/// - marker in body: `NotFound`, whatever the status code
/// - marker absent: 2xx is `Found`; a non-2xx page without the marker is
///   ambiguous and reported as `NotFound`
///
/// The marker is matched as an exact, case-sensitive substring.
pub fn classify(
    outcome: &Result<FetchResponse, TransportError>,
    absence_marker: Option<&str>,
) -> Classification {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            return Classification {
                status: ProbeStatus::Error,
                http_status: None,
                failure: Some(e.kind),
                reason: format!("Request failed: {}", e.message),
            }
        }
    };

    let code = response.status;
    let (status, reason) = match absence_marker {
        None if response.is_success() => (ProbeStatus::Found, format!("HTTP {} - Likely exists", code)),
        None => (ProbeStatus::NotFound, format!("HTTP {}", code)),
        Some(marker) if response.body.contains(marker) => (
            ProbeStatus::NotFound,
            "Profile page indicates user not found".to_string(),
        ),
        Some(_) if response.is_success() => (
            ProbeStatus::Found,
            format!("HTTP {} - No absence marker on page", code),
        ),
        Some(_) => {
            tracing::debug!(
                "Ambiguous response: HTTP {} without absence marker, treating as not found",
                code
            );
            (
                ProbeStatus::NotFound,
                format!("HTTP {} - Ambiguous, treated as not found", code),
            )
        }
    };

    Classification {
        status,
        http_status: Some(code),
        failure: None,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(status: u16, body: &str) -> Result<FetchResponse, TransportError> {
        Ok(FetchResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_success_without_marker_is_found() {
        let c = classify(&ok(200, "<html></html>"), None);
        assert_eq!(c.status, ProbeStatus::Found);
        assert_eq!(c.http_status, Some(200));
    }

    #[test]
    fn test_non_success_without_marker_is_not_found() {
        assert_eq!(classify(&ok(404, ""), None).status, ProbeStatus::NotFound);
        assert_eq!(classify(&ok(500, ""), None).status, ProbeStatus::NotFound);
        assert_eq!(classify(&ok(301, ""), None).status, ProbeStatus::NotFound);
    }

    #[test]
    fn test_marker_in_body_is_not_found() {
        let c = classify(&ok(200, "<h1>User not found</h1>"), Some("User not found"));
        assert_eq!(c.status, ProbeStatus::NotFound);

        let c = classify(&ok(404, "User not found"), Some("User not found"));
        assert_eq!(c.status, ProbeStatus::NotFound);
    }

    #[test]
    fn test_marker_absent_and_success_is_found() {
        let c = classify(&ok(200, "<h1>octocat</h1>"), Some("User not found"));
        assert_eq!(c.status, ProbeStatus::Found);
    }

    #[test]
    fn test_ambiguous_defaults_to_not_found() {
        let c = classify(&ok(503, "maintenance"), Some("User not found"));
        assert_eq!(c.status, ProbeStatus::NotFound);
        assert!(c.reason.contains("Ambiguous"));
    }

    #[test]
    fn test_marker_match_is_case_sensitive() {
        let c = classify(&ok(200, "user NOT found"), Some("User not found"));
        assert_eq!(c.status, ProbeStatus::Found);
    }

    #[test]
    fn test_transport_error_is_error() {
        let outcome = Err(TransportError::new(TransportFailure::Timeout, "timed out"));
        let c = classify(&outcome, Some("User not found"));
        assert_eq!(c.status, ProbeStatus::Error);
        assert_eq!(c.failure, Some(TransportFailure::Timeout));
        assert_eq!(c.http_status, None);
    }

    #[test]
    fn test_classification_is_repeatable() {
        let captured = ok(200, "<p>Sorry, nobody on Reddit goes by that name.</p>");
        let marker = Some("Sorry, nobody on Reddit goes by that name.");
        let first = classify(&captured, marker);
        for _ in 0..10 {
            assert_eq!(classify(&captured, marker), first);
        }
    }
}
