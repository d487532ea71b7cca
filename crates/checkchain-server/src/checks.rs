// File: src/checks.rs
// Purpose: Demo checks registered by the reference server

use checkchain::{check_fn, predicate, sync_check, CheckOutcome, CheckRegistry, Params};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Emails already taken; stands in for a user table
pub type Accounts = Arc<RwLock<HashSet<String>>>;

pub fn registry(accounts: Accounts) -> CheckRegistry {
    CheckRegistry::new()
        .with("string", "required", predicate(|v, _| is_filled(v)))
        .with("string", "email", predicate(|v, _| v.and_then(Value::as_str).is_some_and(is_email)))
        .with("string", "length", sync_check(|v, params| Ok(length(v, params).into())))
        .with("number", "range", sync_check(|v, params| Ok(in_range(v, params).into())))
        .with(
            "account",
            "unique",
            check_fn(move |value, _| {
                let accounts = Arc::clone(&accounts);
                async move {
                    let Some(email) = value.as_ref().and_then(Value::as_str) else {
                        return Ok(CheckOutcome::Fail);
                    };
                    if accounts.read().await.contains(&email.to_lowercase()) {
                        Ok(CheckOutcome::reject("email already registered"))
                    } else {
                        Ok(CheckOutcome::Pass)
                    }
                }
            }),
        )
}

fn is_filled(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// `string.length({"min": n, "max": m})`, both bounds optional
fn length(value: Option<&Value>, params: &Params) -> bool {
    let Some(s) = value.and_then(Value::as_str) else {
        return false;
    };
    let len = s.chars().count() as u64;
    let min = params.option("min").and_then(Value::as_u64).unwrap_or(0);
    let max = params.option("max").and_then(Value::as_u64).unwrap_or(u64::MAX);
    (min..=max).contains(&len)
}

/// `number.range({"min": a, "max": b})`; numeric strings count as numbers
fn in_range(value: Option<&Value>, params: &Params) -> bool {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        return false;
    };
    let min = params.option("min").and_then(Value::as_f64).unwrap_or(f64::MIN);
    let max = params.option("max").and_then(Value::as_f64).unwrap_or(f64::MAX);
    number >= min && number <= max
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkchain::{Check, CheckLookup};
    use serde_json::json;

    fn params(value: Value) -> Params {
        Params::from_args(vec![value])
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("ada@example.com"));
        assert!(!is_email("ada@example"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("ada@@example.com"));
        assert!(!is_email("ada@example..com"));
    }

    #[test]
    fn test_length_bounds() {
        let bounds = params(json!({ "min": 2, "max": 4 }));
        assert!(!length(Some(&json!("a")), &bounds));
        assert!(length(Some(&json!("abcd")), &bounds));
        assert!(!length(Some(&json!("abcde")), &bounds));
        assert!(!length(Some(&json!(42)), &bounds));
    }

    #[test]
    fn test_range_accepts_numeric_strings() {
        let bounds = params(json!({ "min": 18, "max": 130 }));
        assert!(in_range(Some(&json!(30)), &bounds));
        assert!(in_range(Some(&json!("18")), &bounds));
        assert!(!in_range(Some(&json!("17")), &bounds));
        assert!(!in_range(Some(&json!("old")), &bounds));
        assert!(!in_range(None, &bounds));
    }

    #[tokio::test]
    async fn test_account_unique() {
        let accounts: Accounts = Arc::new(RwLock::new(HashSet::from(["ada@example.com".to_string()])));
        let check = registry(accounts).lookup("account", "unique").unwrap();

        let taken = check.check(Some(&json!("Ada@Example.com")), &Params::none()).await.unwrap();
        assert_eq!(taken, CheckOutcome::reject("email already registered"));

        let free = check.check(Some(&json!("grace@example.com")), &Params::none()).await.unwrap();
        assert_eq!(free, CheckOutcome::Pass);
    }
}
