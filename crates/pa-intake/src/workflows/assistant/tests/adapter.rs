use super::common::*;
use crate::workflows::assistant::{AiClientError, AssistantError};
use crate::workflows::intake::ComplianceSnapshot;
use serde_json::json;

fn thin_snapshot() -> ComplianceSnapshot {
    ComplianceSnapshot {
        project_name: "Culvert".to_string(),
        scope_of_work: "Replace culvert".to_string(),
        total_cost: 4_000.0,
        has_insurance: false,
        certificate_agree: true,
        document_count: 2,
    }
}

#[tokio::test]
async fn review_parses_embedded_json() {
    let assistant = assistant(CannedCompletion::text(
        "```json\n{\"isValid\": true, \"validationScore\": 91, \"issues\": []}\n```",
    ));

    let report = assistant
        .review(&json!({ "projectName": "Culvert" }))
        .await
        .expect("review parsed");

    assert!(report.is_valid);
    assert_eq!(report.validation_score, 91.0);
}

#[tokio::test]
async fn review_fills_missing_issue_fields() {
    let assistant = assistant(CannedCompletion::text(
        r#"{"isValid": false, "validationScore": 60, "issues": [{"message": "Missing EIN"}]}"#,
    ));

    let report = assistant.review(&json!({})).await.expect("review parsed");

    assert_eq!(report.issues[0].field, "unknown");
    assert_eq!(report.issues[0].severity, "warning");
    assert_eq!(report.issues[0].message, "Missing EIN");
}

#[tokio::test]
async fn review_without_fallback_surfaces_errors() {
    let assistant = assistant(CannedCompletion::http_error(401));

    match assistant.review(&json!({})).await {
        Err(AssistantError::Client(AiClientError::Status { status: 401, .. })) => {}
        other => panic!("expected client status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fallback_scores_with_review_rules() {
    let assistant = assistant(CannedCompletion::http_error(500));

    let report = assistant
        .review_or_fallback(&json!({}), &thin_snapshot())
        .await;

    assert!(!report.is_valid);
    assert_eq!(report.validation_score, 90.0);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(
        report.issues[0].suggestion,
        "Fix: Scope of Work requires more detailed description (min. 100 characters)"
    );
}

#[tokio::test]
async fn fallback_covers_replies_without_json() {
    let assistant = assistant(CannedCompletion::text("I cannot review this application."));

    let report = assistant
        .review_or_fallback(&json!({}), &thin_snapshot())
        .await;

    assert_eq!(report.validation_score, 90.0);
}

#[tokio::test]
async fn empty_reply_yields_default_review() {
    let assistant = assistant(CannedCompletion::without_content());

    let report = assistant
        .review_or_fallback(&json!({}), &thin_snapshot())
        .await;

    assert!(report.is_valid);
    assert_eq!(report.validation_score, 85.0);
}

#[tokio::test]
async fn extraction_prompt_names_file_type() {
    let client = CannedCompletion::text(r#"{"projectName": "Levee"}"#);
    let assistant = assistant(client);

    let extracted = assistant
        .extract_document("levee survey".as_bytes(), "Survey123")
        .await
        .expect("extraction parsed");

    assert_eq!(extracted, json!({ "projectName": "Levee" }));
}

#[tokio::test]
async fn cost_review_passes_reply_through() {
    let assistant = assistant(CannedCompletion::text(
        r#"{"isCompliant": true, "complianceScore": 95, "issues": []}"#,
    ));

    let review = assistant
        .review_costs(&json!({ "laborCosts": 1000 }))
        .await
        .expect("cost review parsed");

    assert_eq!(review["complianceScore"], 95);
}
