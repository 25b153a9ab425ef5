//! Typed extraction from the untyped argument payload of a tool call.
//!
//! Tool arguments arrive as a JSON object with caller-supplied keys.
//! The getters here apply the required/optional/default policy and raise
//! `MissingParam`/`TypeMismatch` before any upstream call is made.

use rmcp::model::JsonObject;
use serde_json::Value;

use crate::error::{GhxError, Result};

/// Extract a required string. Absent keys and empty strings are both
/// rejected as missing; an empty string is never a usable identifier here.
pub fn required_string(args: &JsonObject, name: &str) -> Result<String> {
    match args.get(name) {
        None => Err(GhxError::MissingParam(name.to_string())),
        Some(value) => {
            let s = coerce_string(name, value)?;
            if s.is_empty() {
                return Err(GhxError::MissingParam(name.to_string()));
            }
            Ok(s)
        }
    }
}

/// Extract an optional string. Absent keys yield the empty string.
pub fn optional_string(args: &JsonObject, name: &str) -> Result<String> {
    match args.get(name) {
        None => Ok(String::new()),
        Some(value) => coerce_string(name, value),
    }
}

/// As [`optional_string`], substituting `default` when the extracted value
/// is empty. An explicit empty string from the caller is indistinguishable
/// from omission.
pub fn optional_string_with_default(args: &JsonObject, name: &str, default: &str) -> Result<String> {
    let value = optional_string(args, name)?;
    if value.is_empty() {
        return Ok(default.to_string());
    }
    Ok(value)
}

/// Extract a required integer. JSON numbers are truncated toward zero;
/// `3.9` coerces to `3` without error.
pub fn required_int(args: &JsonObject, name: &str) -> Result<i64> {
    match args.get(name) {
        None => Err(GhxError::MissingParam(name.to_string())),
        Some(value) => coerce_int(name, value),
    }
}

/// Extract an optional integer. Absent keys yield zero.
pub fn optional_int(args: &JsonObject, name: &str) -> Result<i64> {
    match args.get(name) {
        None => Ok(0),
        Some(value) => coerce_int(name, value),
    }
}

/// As [`optional_int`], substituting `default` when the extracted value is
/// zero. An explicit zero from the caller is indistinguishable from
/// omission.
pub fn optional_int_with_default(args: &JsonObject, name: &str, default: i64) -> Result<i64> {
    let value = optional_int(args, name)?;
    if value == 0 {
        return Ok(default);
    }
    Ok(value)
}

/// Extract an optional boolean. Absent keys yield false.
pub fn optional_bool(args: &JsonObject, name: &str) -> Result<bool> {
    match args.get(name) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(GhxError::TypeMismatch {
            name: name.to_string(),
            expected: "boolean",
        }),
    }
}

/// Extract an optional comma-separated list parameter.
///
/// Absent keys yield an explicitly empty list, never an absent marker, so
/// callers can serialize deterministically. Present values are split on
/// commas, trimmed, and empty pieces dropped; order and duplicates are
/// preserved.
pub fn optional_string_list(args: &JsonObject, name: &str) -> Result<Vec<String>> {
    match args.get(name) {
        None => Ok(Vec::new()),
        Some(value) => {
            let raw = coerce_string(name, value)?;
            Ok(split_comma_list(&raw).unwrap_or_default())
        }
    }
}

/// Split a comma-separated string into trimmed, non-empty pieces.
///
/// An empty source string yields `None` rather than an empty list; the two
/// serialize differently downstream.
pub fn split_comma_list(raw: &str) -> Option<Vec<String>> {
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn coerce_string(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(GhxError::TypeMismatch {
            name: name.to_string(),
            expected: "string",
        }),
    }
}

fn coerce_int(name: &str, value: &Value) -> Result<i64> {
    match value.as_f64() {
        // Truncation toward zero, matching JSON's single number type.
        Some(f) => Ok(f as i64),
        None => Err(GhxError::TypeMismatch {
            name: name.to_string(),
            expected: "number",
        }),
    }
}

/// Canonical pagination pair derived per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: i64,
    pub per_page: i64,
}

impl PaginationParams {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PER_PAGE: i64 = 30;

    /// Derive `(page, perPage)` from the request, applying defaults when a
    /// value is absent or non-positive. The upstream API enforces its own
    /// upper bound; none is applied here.
    pub fn extract(args: &JsonObject) -> Result<Self> {
        let mut page = optional_int(args, "page")?;
        let mut per_page = optional_int(args, "perPage")?;
        if page < 1 {
            page = Self::DEFAULT_PAGE;
        }
        if per_page < 1 {
            per_page = Self::DEFAULT_PER_PAGE;
        }
        Ok(Self { page, per_page })
    }

    /// Append the pair to an outgoing query.
    pub fn apply(&self, query: &mut Vec<(&'static str, String)>) {
        query.push(("page", self.page.to_string()));
        query.push(("per_page", self.per_page.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn required_string_present() {
        let a = args(json!({"owner": "octocat"}));
        assert_eq!(required_string(&a, "owner").unwrap(), "octocat");
    }

    #[test]
    fn required_string_absent_is_missing() {
        let a = args(json!({}));
        assert!(matches!(
            required_string(&a, "owner"),
            Err(GhxError::MissingParam(name)) if name == "owner"
        ));
    }

    #[test]
    fn required_string_empty_is_missing() {
        let a = args(json!({"owner": ""}));
        assert!(matches!(
            required_string(&a, "owner"),
            Err(GhxError::MissingParam(_))
        ));
    }

    #[test]
    fn required_string_wrong_type() {
        let a = args(json!({"owner": 7}));
        assert!(matches!(
            required_string(&a, "owner"),
            Err(GhxError::TypeMismatch { expected: "string", .. })
        ));
    }

    #[test]
    fn explicit_null_is_a_type_mismatch_not_absence() {
        let a = args(json!({"owner": null}));
        assert!(matches!(
            required_string(&a, "owner"),
            Err(GhxError::TypeMismatch { .. })
        ));
        assert!(matches!(
            optional_string(&a, "owner"),
            Err(GhxError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn optional_string_absent_is_empty() {
        let a = args(json!({}));
        assert_eq!(optional_string(&a, "state").unwrap(), "");
    }

    #[test]
    fn optional_string_default_substitution() {
        let a = args(json!({}));
        assert_eq!(
            optional_string_with_default(&a, "state", "open").unwrap(),
            "open"
        );
        // Explicit empty is indistinguishable from omission.
        let a = args(json!({"state": ""}));
        assert_eq!(
            optional_string_with_default(&a, "state", "open").unwrap(),
            "open"
        );
        let a = args(json!({"state": "closed"}));
        assert_eq!(
            optional_string_with_default(&a, "state", "open").unwrap(),
            "closed"
        );
    }

    #[test]
    fn int_truncates_toward_zero() {
        let a = args(json!({"n": 3.0}));
        assert_eq!(required_int(&a, "n").unwrap(), 3);
        let a = args(json!({"n": 3.9}));
        assert_eq!(required_int(&a, "n").unwrap(), 3);
        let a = args(json!({"n": -2.7}));
        assert_eq!(required_int(&a, "n").unwrap(), -2);
    }

    #[test]
    fn int_rejects_non_numbers() {
        let a = args(json!({"n": "7"}));
        assert!(matches!(
            required_int(&a, "n"),
            Err(GhxError::TypeMismatch { expected: "number", .. })
        ));
    }

    #[test]
    fn optional_int_default_substitution() {
        let a = args(json!({}));
        assert_eq!(optional_int_with_default(&a, "n", 42).unwrap(), 42);
        let a = args(json!({"n": 0}));
        assert_eq!(optional_int_with_default(&a, "n", 42).unwrap(), 42);
        let a = args(json!({"n": 5}));
        assert_eq!(optional_int_with_default(&a, "n", 42).unwrap(), 5);
    }

    #[test]
    fn optional_bool_policy() {
        let a = args(json!({"flag": true}));
        assert!(optional_bool(&a, "flag").unwrap());
        let a = args(json!({}));
        assert!(!optional_bool(&a, "flag").unwrap());
        let a = args(json!({"flag": "true"}));
        assert!(matches!(
            optional_bool(&a, "flag"),
            Err(GhxError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn list_absent_is_explicitly_empty() {
        let a = args(json!({}));
        assert_eq!(optional_string_list(&a, "labels").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn list_empty_string_is_explicitly_empty() {
        let a = args(json!({"labels": ""}));
        assert_eq!(optional_string_list(&a, "labels").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn list_splits_trims_and_drops_empties() {
        let a = args(json!({"labels": "a, b ,,c"}));
        assert_eq!(
            optional_string_list(&a, "labels").unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn list_preserves_order_and_duplicates() {
        let a = args(json!({"labels": "bug,bug, feature"}));
        assert_eq!(
            optional_string_list(&a, "labels").unwrap(),
            vec!["bug".to_string(), "bug".to_string(), "feature".to_string()]
        );
    }

    #[test]
    fn splitter_distinguishes_empty_source() {
        assert_eq!(split_comma_list(""), None);
        assert_eq!(split_comma_list(" , "), Some(vec![]));
        assert_eq!(
            split_comma_list("a"),
            Some(vec!["a".to_string()])
        );
    }

    #[test]
    fn pagination_defaults() {
        let a = args(json!({}));
        let p = PaginationParams::extract(&a).unwrap();
        assert_eq!(p, PaginationParams { page: 1, per_page: 30 });
    }

    #[test]
    fn pagination_passthrough() {
        let a = args(json!({"page": 2, "perPage": 50}));
        let p = PaginationParams::extract(&a).unwrap();
        assert_eq!(p, PaginationParams { page: 2, per_page: 50 });
    }

    #[test]
    fn pagination_non_positive_falls_back() {
        let a = args(json!({"page": 0, "perPage": -5}));
        let p = PaginationParams::extract(&a).unwrap();
        assert_eq!(p, PaginationParams { page: 1, per_page: 30 });
    }

    #[test]
    fn pagination_query_shape() {
        let p = PaginationParams { page: 2, per_page: 50 };
        let mut query: Vec<(&'static str, String)> = Vec::new();
        p.apply(&mut query);
        assert_eq!(
            query,
            vec![("page", "2".to_string()), ("per_page", "50".to_string())]
        );
    }
}
