//! Input validation for attribution requests

use std::collections::HashSet;

use shared::{AttributionRequest, EngineConfig};

use crate::error::{AttributionError, AttributionResult};

/// Check a request against the data contract and engine limits
pub fn validate_request(request: &AttributionRequest, config: &EngineConfig) -> AttributionResult<()> {
    if request.order_id.trim().is_empty() {
        return Err(AttributionError::validation("order_id", "must not be empty"));
    }

    let value = request.conversion_value;
    if !value.is_finite() {
        return Err(AttributionError::validation(
            "conversion_value",
            format!("must be finite, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(AttributionError::validation(
            "conversion_value",
            format!("must be non-negative, got {value}"),
        ));
    }

    if request.iterations == Some(0) {
        return Err(AttributionError::validation("iterations", "must be at least 1"));
    }

    let count = request.touchpoints.len();
    if count > config.max_touchpoints {
        return Err(AttributionError::validation(
            "touchpoints",
            format!("{count} touchpoints exceeds the limit of {}", config.max_touchpoints),
        ));
    }

    let mut seen = HashSet::with_capacity(count);
    for (index, tp) in request.touchpoints.iter().enumerate() {
        if tp.id.trim().is_empty() {
            return Err(AttributionError::validation(
                format!("touchpoints[{index}].id"),
                "must not be empty",
            ));
        }
        if !seen.insert(tp.id.as_str()) {
            return Err(AttributionError::validation(
                format!("touchpoints[{index}].id"),
                format!("duplicate touchpoint id '{}'", tp.id),
            ));
        }
        if !tp.cost.is_finite() || tp.cost < 0.0 {
            return Err(AttributionError::validation(
                format!("touchpoints[{index}].cost"),
                format!("must be finite and non-negative, got {}", tp.cost),
            ));
        }
        if let Some(score) = tp.quality_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(AttributionError::validation(
                    format!("touchpoints[{index}].quality_score"),
                    format!("must be within [0, 1], got {score}"),
                ));
            }
        }
    }

    if let Some(converted_at) = request.converted_at {
        if count > 0 && request.touchpoints.iter().all(|tp| tp.timestamp > converted_at) {
            return Err(AttributionError::validation(
                "converted_at",
                "no touchpoint precedes the conversion",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};
    use shared::Touchpoint;

    fn touchpoint(id: &str) -> Touchpoint {
        Touchpoint::new(id, "media", Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap())
    }

    fn reason(result: AttributionResult<()>) -> (String, String) {
        match result {
            Err(AttributionError::Validation { field, reason }) => (field, reason),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_empty_journey() {
        let request = AttributionRequest::new("o-1", vec![], 1000.0);
        assert!(validate_request(&request, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_negative_value() {
        let request = AttributionRequest::new("o-1", vec![touchpoint("a")], -1.0);
        let (field, reason) = reason(validate_request(&request, &EngineConfig::default()));
        assert_eq!(field, "conversion_value");
        assert!(reason.contains("non-negative"));
    }

    #[test]
    fn test_rejects_nan_value() {
        let request = AttributionRequest::new("o-1", vec![], f64::NAN);
        assert_matches!(
            validate_request(&request, &EngineConfig::default()),
            Err(AttributionError::Validation { .. })
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let request = AttributionRequest::new("o-1", vec![touchpoint("a"), touchpoint("a")], 10.0);
        let (field, reason) = reason(validate_request(&request, &EngineConfig::default()));
        assert_eq!(field, "touchpoints[1].id");
        assert!(reason.contains("duplicate"));
    }

    #[test]
    fn test_rejects_bad_cost_and_quality() {
        let config = EngineConfig::default();
        let negative_cost = AttributionRequest::new("o-1", vec![touchpoint("a").with_cost(-2.0)], 10.0);
        let high_quality = AttributionRequest::new("o-1", vec![touchpoint("a").with_quality(1.5)], 10.0);

        assert_eq!(reason(validate_request(&negative_cost, &config)).0, "touchpoints[0].cost");
        assert_eq!(reason(validate_request(&high_quality, &config)).0, "touchpoints[0].quality_score");
    }

    #[test]
    fn test_rejects_journey_over_limit() {
        let config = EngineConfig {
            max_touchpoints: 2,
            ..EngineConfig::default()
        };
        let request = AttributionRequest::new(
            "o-1",
            vec![touchpoint("a"), touchpoint("b"), touchpoint("c")],
            10.0,
        );
        assert_eq!(reason(validate_request(&request, &config)).0, "touchpoints");
    }

    #[test]
    fn test_rejects_conversion_before_every_touchpoint() {
        let tp = touchpoint("a");
        let request = AttributionRequest::new("o-1", vec![tp.clone()], 10.0)
            .converted_at(tp.timestamp - Duration::hours(1));
        assert_eq!(reason(validate_request(&request, &EngineConfig::default())).0, "converted_at");
    }
}
