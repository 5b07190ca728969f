use serde::Serialize;

use super::config::EvaluationConfig;
use super::{ComplianceSnapshot, RuleSet};

pub(crate) const THIN_SCOPE_UPDATE: &str = "Scope of Work lacks sufficient detail";
pub(crate) const UNINSURED_LARGE_PROJECT: &str = "Large projects require insurance documentation";
pub(crate) const UNCERTIFIED: &str = "Application must be certified before submission";
pub(crate) const MISSING_PROJECT_NAME: &str = "Project Name is required";
pub(crate) const NON_POSITIVE_COST: &str = "Project must have estimated costs greater than $0";
pub(crate) const MISSING_DOCUMENTS: &str = "Supporting documentation is required for FEMA review";

/// Identifies which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceRule {
    ScopeDetail,
    LargeProjectInsurance,
    Certification,
    ProjectName,
    PositiveCost,
    SupportingDocuments,
}

/// One failed check and the points it costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFinding {
    pub rule: ComplianceRule,
    pub message: String,
    pub penalty: f64,
}

pub(crate) fn evaluate_rules(
    snapshot: &ComplianceSnapshot,
    rule_set: RuleSet,
    config: &EvaluationConfig,
) -> Vec<RuleFinding> {
    let mut findings = Vec::new();
    let penalties = &config.penalties;

    match rule_set {
        RuleSet::Update => {
            if scope_length(snapshot) < config.update_scope_min_chars {
                findings.push(RuleFinding {
                    rule: ComplianceRule::ScopeDetail,
                    message: THIN_SCOPE_UPDATE.to_string(),
                    penalty: penalties.thin_scope_update,
                });
            }

            if snapshot.total_cost > config.large_project_threshold && !snapshot.has_insurance {
                findings.push(RuleFinding {
                    rule: ComplianceRule::LargeProjectInsurance,
                    message: UNINSURED_LARGE_PROJECT.to_string(),
                    penalty: penalties.uninsured_large_project,
                });
            }

            if !snapshot.certificate_agree {
                findings.push(RuleFinding {
                    rule: ComplianceRule::Certification,
                    message: UNCERTIFIED.to_string(),
                    penalty: penalties.uncertified,
                });
            }
        }
        RuleSet::Review => {
            if snapshot.project_name.trim().is_empty() {
                findings.push(RuleFinding {
                    rule: ComplianceRule::ProjectName,
                    message: MISSING_PROJECT_NAME.to_string(),
                    penalty: penalties.missing_project_name,
                });
            }

            if scope_length(snapshot) < config.review_scope_min_chars {
                findings.push(RuleFinding {
                    rule: ComplianceRule::ScopeDetail,
                    message: format!(
                        "Scope of Work requires more detailed description (min. {} characters)",
                        config.review_scope_min_chars
                    ),
                    penalty: penalties.thin_scope_review,
                });
            }

            if snapshot.total_cost <= 0.0 {
                findings.push(RuleFinding {
                    rule: ComplianceRule::PositiveCost,
                    message: NON_POSITIVE_COST.to_string(),
                    penalty: penalties.non_positive_cost,
                });
            }

            if snapshot.document_count == 0 {
                findings.push(RuleFinding {
                    rule: ComplianceRule::SupportingDocuments,
                    message: MISSING_DOCUMENTS.to_string(),
                    penalty: penalties.missing_documents,
                });
            }
        }
    }

    findings
}

fn scope_length(snapshot: &ComplianceSnapshot) -> usize {
    snapshot.scope_of_work.chars().count()
}
