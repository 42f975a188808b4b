//! Condition synthesis tests
//!
//! Status codes and text derived from Knative-style condition lists.

use kntopo::status::{
    Condition, ConditionStatus, Conditions, READY, StatusCode, summarize_conditions,
};
use serde_json::json;

#[test]
fn test_revision_missing_is_error() {
    let obj = json!({
        "status": {
            "conditions": [
                { "type": "Ready", "status": "False", "reason": "RevisionMissing" }
            ]
        }
    });
    let summary = Conditions::from_object(&obj).ready();
    assert_eq!(summary.status_code(), StatusCode::Error);
    assert_eq!(summary.status_code().code(), 3);
    assert_eq!(summary.status_text(), "Not Ready - RevisionMissing");
}

#[test]
fn test_status_code_covers_every_condition_list() {
    let statuses = [
        None,
        Some(ConditionStatus::True),
        Some(ConditionStatus::False),
        Some(ConditionStatus::Unknown),
    ];

    for target in statuses {
        for other in statuses {
            let mut list = Vec::new();
            if let Some(status) = other {
                list.push(Condition::new("RoutesReady", status));
            }
            if let Some(status) = target {
                list.push(Condition::new(READY, status));
            }

            let code = Conditions::new(list).ready().status_code().code();
            let expected = match target {
                Some(ConditionStatus::True) => 1,
                Some(ConditionStatus::False) => 3,
                _ => 2,
            };
            assert_eq!(code, expected, "Ready={:?} other={:?}", target, other);
        }
    }
}

#[test]
fn test_missing_condition_is_unknown() {
    let summary = Conditions::default().status("ConfigurationsReady");
    assert!(summary.condition().is_none());
    assert_eq!(summary.status_code(), StatusCode::Warning);
    assert_eq!(summary.status_text(), "Unknown");
}

#[test]
fn test_unknown_includes_reason_and_message() {
    let conditions = Conditions::new(vec![
        Condition::new(READY, ConditionStatus::Unknown)
            .with_reason("Deploying")
            .with_message("Waiting for pods"),
    ]);
    assert_eq!(
        conditions.ready().status_text(),
        "Unknown - Deploying - Waiting for pods"
    );
}

#[test]
fn test_unrecognized_status_string_is_unknown() {
    let obj = json!({
        "status": {
            "conditions": [{ "type": "Ready", "status": "Maybe" }]
        }
    });
    let conditions = Conditions::from_object(&obj);
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions.ready().status_code(), StatusCode::Warning);
}

#[test]
fn test_object_without_status() {
    let conditions = Conditions::from_object(&json!({ "metadata": { "name": "x" } }));
    assert!(conditions.is_empty());
    assert_eq!(conditions.ready().status_code(), StatusCode::Warning);
}

#[test]
fn test_condition_table_keeps_list_order() {
    let obj = json!({
        "status": {
            "conditions": [
                { "type": "ConfigurationsReady", "status": "True" },
                { "type": "Ready", "status": "False", "reason": "RevisionFailed", "message": "Container failed" },
                { "type": "RoutesReady", "status": "Unknown" }
            ]
        }
    });
    let rows = summarize_conditions(&Conditions::from_object(&obj));
    let types: Vec<&str> = rows.iter().map(|r| r.type_.as_str()).collect();
    assert_eq!(types, vec!["ConfigurationsReady", "Ready", "RoutesReady"]);
    assert_eq!(rows[1].status, StatusCode::Error);
    assert_eq!(rows[1].text, "Not Ready - RevisionFailed");
    assert_eq!(rows[1].message.as_deref(), Some("Container failed"));
}
