use std::time::Duration;

use skyfeed::{FailureKind, Result, SkyfeedError};

#[test]
fn test_error_display() {
    let err = SkyfeedError::Api {
        status: 503,
        code: None,
        message: "upstream unavailable".into(),
    };
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("upstream unavailable"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SkyfeedError::Storage("full".into()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Failure classification
// ============================================================================

#[test]
fn quota_failures() {
    let over_limit = SkyfeedError::RateLimited {
        status: 403,
        code: Some("OVER_RATE_LIMIT".into()),
        retry_after: None,
    };
    assert_eq!(over_limit.kind(), FailureKind::Quota);
    assert!(over_limit.is_rate_limited());
    assert_eq!(over_limit.status(), Some(403));

    let too_many = SkyfeedError::RateLimited {
        status: 429,
        code: None,
        retry_after: Some(Duration::from_secs(3600)),
    };
    assert!(too_many.is_rate_limited());
    assert_eq!(too_many.retry_after(), Some(Duration::from_secs(3600)));
}

#[test]
fn transport_failures() {
    assert_eq!(
        SkyfeedError::Transport("connection reset".into()).kind(),
        FailureKind::Transport
    );
    let api = SkyfeedError::Api {
        status: 500,
        code: None,
        message: "internal".into(),
    };
    assert_eq!(api.kind(), FailureKind::Transport);
    assert!(!api.is_rate_limited());
    assert_eq!(api.retry_after(), None);
}

#[test]
fn data_and_local_failures() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert_eq!(SkyfeedError::from(json).kind(), FailureKind::Malformed);
    assert_eq!(
        SkyfeedError::Malformed("missing field".into()).kind(),
        FailureKind::Malformed
    );
    assert_eq!(
        SkyfeedError::Storage("quota".into()).kind(),
        FailureKind::Storage
    );
    assert_eq!(
        SkyfeedError::Configuration("bad".into()).kind(),
        FailureKind::Configuration
    );
    assert_eq!(SkyfeedError::Storage("quota".into()).status(), None);
}
