//! Bounds-checked parameter objects for the Application Signals tools

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_HOURS_BACK: i64 = 24;
pub const MAX_DETAIL_HOURS_BACK: i64 = 168;
pub const MIN_MAX_RESULTS: i64 = 1;
pub const MAX_MAX_RESULTS: i64 = 500;
/// Record-level default for `max_results`.
pub const DEFAULT_MAX_RESULTS: i64 = 50;
/// Default the `list_monitored_services` tool applies when the caller omits `max_results`.
pub const DEFAULT_TOOL_MAX_RESULTS: i64 = 100;
/// Cap for the lookup listing issued by `get_service_detail`.
pub const DETAIL_LOOKUP_MAX_RESULTS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub constraint: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

/// Every constraint a set of parameters violated, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: &'static str, constraint: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                constraint: constraint.into(),
            }],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, constraint: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            constraint: constraint.into(),
        });
    }

    fn check_range(&mut self, field: &'static str, value: i64, min: i64, max: Option<i64>) {
        if value < min {
            self.push(field, format!("must be ≥ {min} (got {value})"));
        } else if let Some(max) = max.filter(|max| value > *max) {
            self.push(field, format!("must be ≤ {max} (got {value})"));
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

/// `[start, end]` window ending at `now` and reaching `hours_back` hours into the past.
pub fn lookback_window(
    hours_back: i64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    checked_window(hours_back, now)
        .ok_or_else(|| ValidationError::single("hours_back", out_of_range(hours_back)))
}

fn checked_window(hours_back: i64, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = TimeDelta::try_hours(hours_back).and_then(|span| now.checked_sub_signed(span))?;
    Some((start, now))
}

fn out_of_range(hours_back: i64) -> String {
    format!("is out of range (got {hours_back})")
}

/// Input of an upstream ListServices call, serialized with the upstream request field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListServicesParams {
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "MaxResults")]
    pub max_results: i64,
    #[serde(rename = "NextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "IncludeLinkedAccounts")]
    pub include_linked_accounts: bool,
    #[serde(rename = "AwsAccountId", skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
}

impl ListServicesParams {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            max_results: DEFAULT_MAX_RESULTS,
            next_token: None,
            include_linked_accounts: false,
            aws_account_id: None,
        }
    }

    /// Window of `hours_back` hours ending now, validated.
    pub fn for_lookback(
        hours_back: i64,
        max_results: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut violations = Violations::default();
        let window = checked_window(hours_back, now);
        if hours_back < 1 {
            violations.check_range("hours_back", hours_back, 1, None);
        } else if window.is_none() {
            violations.push("hours_back", out_of_range(hours_back));
        }
        violations.check_range(
            "max_results",
            max_results,
            MIN_MAX_RESULTS,
            Some(MAX_MAX_RESULTS),
        );
        violations.finish()?;

        let (start_time, end_time) = window
            .ok_or_else(|| ValidationError::single("hours_back", out_of_range(hours_back)))?;
        Ok(Self {
            max_results,
            ..Self::new(start_time, end_time)
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::default();
        if self.start_time > self.end_time {
            violations.push("start_time", "must not be after end_time");
        }
        violations.check_range(
            "max_results",
            self.max_results,
            MIN_MAX_RESULTS,
            Some(MAX_MAX_RESULTS),
        );
        violations.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetServiceDetailParams {
    /// Case-sensitive; kept exactly as supplied.
    pub service_name: String,
    pub hours_back: i64,
}

impl GetServiceDetailParams {
    pub fn new(service_name: impl Into<String>, hours_back: i64) -> Result<Self, ValidationError> {
        let params = Self {
            service_name: service_name.into(),
            hours_back,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::default();
        if self.service_name.trim().is_empty() {
            violations.push("service_name", "must not be empty");
        }
        violations.check_range(
            "hours_back",
            self.hours_back,
            1,
            Some(MAX_DETAIL_HOURS_BACK),
        );
        violations.finish()
    }

    pub fn window(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
        lookback_window(self.hours_back, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 27, 12, 0, 0).single().expect("valid time")
    }

    #[test]
    fn record_defaults_apply() {
        let params = ListServicesParams::new(now(), now());

        assert_eq!(params.max_results, DEFAULT_MAX_RESULTS);
        assert!(params.next_token.is_none());
        assert!(!params.include_linked_accounts);
        assert!(params.aws_account_id.is_none());
        params.validate().expect("equal bounds are valid");
    }

    #[test]
    fn accepts_every_max_results_in_bounds() {
        for max_results in MIN_MAX_RESULTS..=MAX_MAX_RESULTS {
            let params = ListServicesParams::for_lookback(24, max_results, now())
                .expect("in-bounds max_results");
            assert_eq!(params.max_results, max_results);
        }
    }

    #[test]
    fn rejects_max_results_zero() {
        let error = ListServicesParams::for_lookback(24, 0, now()).expect_err("zero rejected");
        assert_eq!(error.to_string(), "max_results: must be ≥ 1 (got 0)");
    }

    #[test]
    fn rejects_max_results_above_limit() {
        let error = ListServicesParams::for_lookback(24, 501, now()).expect_err("501 rejected");
        assert_eq!(error.to_string(), "max_results: must be ≤ 500 (got 501)");
    }

    #[test]
    fn lists_every_violation() {
        let params = ListServicesParams {
            max_results: 900,
            ..ListServicesParams::new(now(), now() - TimeDelta::hours(1))
        };

        let error = params.validate().expect_err("two violations");
        assert_eq!(error.violations.len(), 2);
        assert_eq!(
            error.to_string(),
            "start_time: must not be after end_time; max_results: must be ≤ 500 (got 900)"
        );
    }

    #[test]
    fn list_rejects_non_positive_hours_back() {
        let error = ListServicesParams::for_lookback(0, 100, now()).expect_err("zero window");
        assert_eq!(error.to_string(), "hours_back: must be ≥ 1 (got 0)");
    }

    #[test]
    fn list_rejects_unrepresentable_window() {
        let error =
            ListServicesParams::for_lookback(i64::MAX, 100, now()).expect_err("overflowing window");
        assert!(error.to_string().starts_with("hours_back: is out of range"));
    }

    #[test]
    fn list_reports_window_and_limit_violations_together() {
        let error = ListServicesParams::for_lookback(0, 0, now()).expect_err("two violations");
        assert_eq!(
            error.to_string(),
            "hours_back: must be ≥ 1 (got 0); max_results: must be ≥ 1 (got 0)"
        );

        let error = ListServicesParams::for_lookback(i64::MAX, 501, now())
            .expect_err("overflow and limit");
        assert_eq!(
            error.to_string(),
            format!("hours_back: is out of range (got {}); max_results: must be ≤ 500 (got 501)", i64::MAX)
        );
    }

    #[test]
    fn lookback_window_spans_requested_hours() {
        let params = ListServicesParams::for_lookback(48, 50, now()).expect("valid params");

        assert_eq!(params.end_time, now());
        assert_eq!(params.end_time - params.start_time, TimeDelta::hours(48));
    }

    #[test]
    fn serializes_request_with_wire_names() {
        let params = ListServicesParams {
            next_token: Some("token-1".to_string()),
            ..ListServicesParams::new(now() - TimeDelta::hours(1), now())
        };

        let wire = serde_json::to_value(&params).expect("serialize params");
        assert_eq!(wire["MaxResults"], json!(50));
        assert_eq!(wire["NextToken"], json!("token-1"));
        assert_eq!(wire["IncludeLinkedAccounts"], json!(false));
        assert!(wire.get("AwsAccountId").is_none());
        assert!(wire["StartTime"].as_str().is_some_and(|value| value.ends_with('Z')));
    }

    #[test]
    fn detail_accepts_hours_back_in_bounds() {
        for hours_back in 1..=MAX_DETAIL_HOURS_BACK {
            GetServiceDetailParams::new("checkout-service", hours_back).expect("in-bounds hours");
        }
    }

    #[test]
    fn detail_rejects_hours_back_above_week() {
        let error = GetServiceDetailParams::new("checkout-service", 200).expect_err("200 rejected");
        assert!(error.to_string().contains("≤ 168"));
        assert_eq!(error.to_string(), "hours_back: must be ≤ 168 (got 200)");
    }

    #[test]
    fn detail_rejects_blank_name_and_bad_window_together() {
        let error = GetServiceDetailParams::new("  ", 0).expect_err("two violations");
        assert_eq!(
            error.to_string(),
            "service_name: must not be empty; hours_back: must be ≥ 1 (got 0)"
        );
    }

    #[test]
    fn detail_keeps_service_name_verbatim() {
        let params = GetServiceDetailParams::new(" Checkout ", 24).expect("valid params");
        assert_eq!(params.service_name, " Checkout ");

        let (start, end) = params.window(now()).expect("valid window");
        assert_eq!(end - start, TimeDelta::hours(24));
    }
}
