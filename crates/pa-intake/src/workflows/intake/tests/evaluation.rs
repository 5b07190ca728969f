use super::common::*;
use crate::workflows::intake::evaluation::{ComplianceRule, PenaltySchedule};
use crate::workflows::intake::{
    ComplianceEvaluator, ComplianceScore, ComplianceSnapshot, EvaluationConfig, RuleSet,
};
use serde_json::json;

fn clean_snapshot() -> ComplianceSnapshot {
    ComplianceSnapshot {
        project_name: "Bridge repair".to_string(),
        scope_of_work: DETAILED_SCOPE.to_string(),
        total_cost: 250_000.0,
        has_insurance: true,
        certificate_agree: true,
        document_count: 1,
    }
}

fn evaluator() -> ComplianceEvaluator {
    ComplianceEvaluator::new(EvaluationConfig::default())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn clean_form_keeps_update_baseline() {
    let assessment = evaluator().assess(&clean_snapshot(), RuleSet::Update);

    assert!(assessment.is_compliant());
    assert_close(assessment.score.probability(), 0.90);
    assert_eq!(
        assessment.recommendations(),
        vec!["Application appears complete and ready for submission".to_string()]
    );
}

#[test]
fn scope_just_under_fifty_chars_costs_ten_points() {
    let mut snapshot = clean_snapshot();
    snapshot.scope_of_work = "x".repeat(49);

    let assessment = evaluator().assess(&snapshot, RuleSet::Update);

    assert_eq!(
        assessment.warnings(),
        vec!["Scope of Work lacks sufficient detail".to_string()]
    );
    assert_close(assessment.score.probability(), 0.80);
    assert_eq!(
        assessment.recommendations(),
        vec!["Address all validation warnings to improve approval chance".to_string()]
    );
}

#[test]
fn scope_of_exactly_fifty_chars_passes_update_rules() {
    let mut snapshot = clean_snapshot();
    snapshot.scope_of_work = "é".repeat(50);

    let assessment = evaluator().assess(&snapshot, RuleSet::Update);
    assert!(assessment.is_compliant());
}

#[test]
fn uncertified_form_is_flagged_and_penalized() {
    let mut snapshot = clean_snapshot();
    snapshot.certificate_agree = false;

    let assessment = evaluator().assess(&snapshot, RuleSet::Update);

    assert!(assessment
        .warnings()
        .contains(&"Application must be certified before submission".to_string()));
    assert!(assessment.score.probability() <= 0.90 - 0.20 + 1e-9);
    assert_close(assessment.score.probability(), 0.70);
}

#[test]
fn uninsured_large_project_is_flagged() {
    let mut snapshot = clean_snapshot();
    snapshot.total_cost = 1_000_000.01;
    snapshot.has_insurance = false;

    let assessment = evaluator().assess(&snapshot, RuleSet::Update);

    assert_eq!(assessment.findings.len(), 1);
    assert_eq!(
        assessment.findings[0].rule,
        ComplianceRule::LargeProjectInsurance
    );
    assert_close(assessment.score.probability(), 0.75);
}

#[test]
fn exactly_one_million_does_not_need_insurance() {
    let mut snapshot = clean_snapshot();
    snapshot.total_cost = 1_000_000.0;
    snapshot.has_insurance = false;

    assert!(evaluator()
        .assess(&snapshot, RuleSet::Update)
        .is_compliant());
}

#[test]
fn update_findings_follow_rule_order() {
    let snapshot = ComplianceSnapshot {
        total_cost: 2_000_000.0,
        ..ComplianceSnapshot::default()
    };

    let assessment = evaluator().assess(&snapshot, RuleSet::Update);

    assert_eq!(
        assessment.warnings(),
        vec![
            "Scope of Work lacks sufficient detail".to_string(),
            "Large projects require insurance documentation".to_string(),
            "Application must be certified before submission".to_string(),
        ]
    );
    assert_close(assessment.score.probability(), 0.45);
}

#[test]
fn probability_is_clamped_at_zero() {
    let config = EvaluationConfig {
        penalties: PenaltySchedule {
            uncertified: 250.0,
            ..EvaluationConfig::default().penalties
        },
        ..EvaluationConfig::default()
    };
    let mut snapshot = clean_snapshot();
    snapshot.certificate_agree = false;

    let assessment = ComplianceEvaluator::new(config).assess(&snapshot, RuleSet::Update);

    assert_eq!(assessment.score.probability(), 0.0);
    assert!(!assessment.is_compliant());
}

#[test]
fn processing_results_mirror_warnings() {
    let mut snapshot = clean_snapshot();
    snapshot.certificate_agree = false;

    let results = evaluator()
        .assess(&snapshot, RuleSet::Update)
        .processing_results();

    assert_close(results.approval_probability, 0.70);
    assert_eq!(results.validation_warnings, results.pappg_compliance.compliance_issues);
    assert!(!results.pappg_compliance.is_compliant);
    assert_eq!(results.pappg_compliance.compliance_score, None);
}

#[test]
fn review_rules_score_out_of_one_hundred() {
    let report = evaluator()
        .assess(&ComplianceSnapshot::default(), RuleSet::Review)
        .validation_report();

    assert!(!report.is_valid);
    assert_eq!(report.validation_score, 50.0);
    let messages: Vec<&str> = report
        .issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Project Name is required",
            "Scope of Work requires more detailed description (min. 100 characters)",
            "Project must have estimated costs greater than $0",
            "Supporting documentation is required for FEMA review",
        ]
    );
    for issue in &report.issues {
        assert_eq!(issue.field, "unknown");
        assert_eq!(issue.severity, "warning");
        assert_eq!(issue.suggestion, format!("Fix: {}", issue.message));
    }
}

#[test]
fn review_rules_pass_complete_form() {
    let report = evaluator()
        .assess(&clean_snapshot(), RuleSet::Review)
        .validation_report();

    assert!(report.is_valid);
    assert_eq!(report.validation_score, 100.0);
    assert!(report.issues.is_empty());

    let compliance = report.pappg_compliance();
    assert!(compliance.is_compliant);
    assert_eq!(compliance.compliance_score, Some(100.0));
}

#[test]
fn review_treats_blank_project_name_as_missing() {
    let mut snapshot = clean_snapshot();
    snapshot.project_name = "   ".to_string();

    let assessment = evaluator().assess(&snapshot, RuleSet::Review);
    assert_eq!(assessment.findings.len(), 1);
    assert_eq!(assessment.findings[0].rule, ComplianceRule::ProjectName);
    assert_eq!(assessment.score.points(), 95.0);
}

#[test]
fn score_is_clamped_to_scale() {
    assert_eq!(ComplianceScore::new(120.0).points(), 100.0);
    assert_eq!(ComplianceScore::new(-5.0).points(), 0.0);
    assert_close(ComplianceScore::new(68.0).probability(), 0.68);
}

#[test]
fn snapshot_of_submission_reads_wizard_flags() {
    let snapshot = ComplianceSnapshot::of_submission(&submission_with(json!({
        "hasInsurance": "no",
        "certificateAgree": "on",
        "laborCosts": "10",
        "materialsSupplies": "abc",
        "equipmentCosts": 5,
        "contractedServices": null,
        "otherCosts": null,
        "documents": []
    })));

    assert!(!snapshot.has_insurance);
    assert!(snapshot.certificate_agree);
    assert_eq!(snapshot.total_cost, 15.0);
    assert_eq!(snapshot.document_count, 0);
    assert_eq!(snapshot.scope_of_work, DETAILED_SCOPE);
}
