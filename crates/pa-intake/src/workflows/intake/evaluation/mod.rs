//! Rule-based PAPPG compliance scoring.
//!
//! Both rule sets score on one scale: compliance points in `[0, 100]`. The
//! approval probability stored on a form is `points / 100`.

mod config;
mod rules;

pub use config::{EvaluationConfig, PenaltySchedule};
pub use rules::{ComplianceRule, RuleFinding};

use serde::Serialize;

use super::domain::{
    AiProcessingResults, IntakeForm, PappgCompliance, ValidationIssue, ValidationReport,
};
use super::submission::{agreed, yes_flag, IntakeSubmission};

pub(crate) const RECOMMEND_ADDRESS_WARNINGS: &str =
    "Address all validation warnings to improve approval chance";
pub(crate) const RECOMMEND_READY: &str = "Application appears complete and ready for submission";

/// Which check list to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Runs on every form update; starts below full marks.
    Update,
    /// Standalone review used when the AI reviewer is unavailable.
    Review,
}

/// The handful of form facts the rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplianceSnapshot {
    pub project_name: String,
    pub scope_of_work: String,
    pub total_cost: f64,
    pub has_insurance: bool,
    pub certificate_agree: bool,
    pub document_count: usize,
}

impl ComplianceSnapshot {
    pub fn of_form(form: &IntakeForm) -> Self {
        Self {
            project_name: form.project.name.clone(),
            scope_of_work: form.project.scope_of_work.clone(),
            total_cost: form.cost_breakdown.total,
            has_insurance: form.insurance_info.has_insurance,
            certificate_agree: form.compliance.certificate_agree,
            document_count: form.documents.len(),
        }
    }

    /// Snapshot of a payload that has not been stored; blank fields simply fail
    /// their checks.
    pub fn of_submission(submission: &IntakeSubmission) -> Self {
        Self {
            project_name: submission.project_name.clone().unwrap_or_default(),
            scope_of_work: submission.scope_of_work.clone().unwrap_or_default(),
            total_cost: submission.cost_inputs().aggregate().total,
            has_insurance: yes_flag(submission.has_insurance.as_ref()),
            certificate_agree: agreed(submission.certificate_agree.as_ref()),
            document_count: submission.documents.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Compliance points, clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ComplianceScore(f64);

impl ComplianceScore {
    pub const MAX: f64 = 100.0;

    pub fn new(points: f64) -> Self {
        Self(points.clamp(0.0, Self::MAX))
    }

    pub fn points(&self) -> f64 {
        self.0
    }

    pub fn probability(&self) -> f64 {
        self.0 / Self::MAX
    }
}

/// Outcome of running one rule set over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceAssessment {
    pub rule_set: RuleSet,
    pub findings: Vec<RuleFinding>,
    pub score: ComplianceScore,
}

impl ComplianceAssessment {
    pub fn warnings(&self) -> Vec<String> {
        self.findings
            .iter()
            .map(|finding| finding.message.clone())
            .collect()
    }

    pub fn is_compliant(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn recommendations(&self) -> Vec<String> {
        let recommendation = if self.is_compliant() {
            RECOMMEND_READY
        } else {
            RECOMMEND_ADDRESS_WARNINGS
        };
        vec![recommendation.to_string()]
    }

    /// Results stored on a form after an update.
    pub fn processing_results(&self) -> AiProcessingResults {
        AiProcessingResults {
            approval_probability: self.score.probability(),
            validation_warnings: self.warnings(),
            recommendations: self.recommendations(),
            pappg_compliance: PappgCompliance {
                is_compliant: self.is_compliant(),
                compliance_issues: self.warnings(),
                compliance_score: None,
            },
        }
    }

    /// Review-shaped report, one issue per finding.
    pub fn validation_report(&self) -> ValidationReport {
        ValidationReport {
            is_valid: self.is_compliant(),
            validation_score: self.score.points(),
            issues: self
                .findings
                .iter()
                .map(|finding| ValidationIssue {
                    message: finding.message.clone(),
                    suggestion: format!("Fix: {}", finding.message),
                    ..ValidationIssue::default()
                })
                .collect(),
        }
    }
}

/// Stateless evaluator that applies the configured rule sets to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEvaluator {
    config: EvaluationConfig,
}

impl ComplianceEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn assess(&self, snapshot: &ComplianceSnapshot, rule_set: RuleSet) -> ComplianceAssessment {
        let findings = rules::evaluate_rules(snapshot, rule_set, &self.config);
        let baseline = match rule_set {
            RuleSet::Update => self.config.update_baseline,
            RuleSet::Review => self.config.review_baseline,
        };
        let deducted: f64 = findings.iter().map(|finding| finding.penalty).sum();

        ComplianceAssessment {
            rule_set,
            findings,
            score: ComplianceScore::new(baseline - deducted),
        }
    }
}
