use serde::{Deserialize, Serialize};

/// Thresholds and point deductions used by the compliance rules.
///
/// All weights are expressed on the 0-100 compliance scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub update_baseline: f64,
    pub review_baseline: f64,
    pub update_scope_min_chars: usize,
    pub review_scope_min_chars: usize,
    pub large_project_threshold: f64,
    pub penalties: PenaltySchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltySchedule {
    pub thin_scope_update: f64,
    pub uninsured_large_project: f64,
    pub uncertified: f64,
    pub missing_project_name: f64,
    pub thin_scope_review: f64,
    pub non_positive_cost: f64,
    pub missing_documents: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            update_baseline: 90.0,
            review_baseline: 100.0,
            update_scope_min_chars: 50,
            review_scope_min_chars: 100,
            large_project_threshold: 1_000_000.0,
            penalties: PenaltySchedule {
                thin_scope_update: 10.0,
                uninsured_large_project: 15.0,
                uncertified: 20.0,
                missing_project_name: 5.0,
                thin_scope_review: 10.0,
                non_positive_cost: 15.0,
                missing_documents: 20.0,
            },
        }
    }
}
