use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 教学计划状态
    #[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
    pub enum PlanStatus("教学计划状态") {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl PlanStatus {
    /// 允许的状态流转
    pub fn can_transition_to(&self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Submitted)
                | (PlanStatus::Rejected, PlanStatus::Submitted)
                | (PlanStatus::Submitted, PlanStatus::Approved)
                | (PlanStatus::Submitted, PlanStatus::Rejected)
        )
    }

    /// 草稿和被驳回的计划可以编辑
    pub fn is_editable(&self) -> bool {
        matches!(self, PlanStatus::Draft | PlanStatus::Rejected)
    }
}

// 教学周安排
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumTopic {
    pub week: i32,
    pub topic: String,
    pub objectives: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumPlan {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    /// 形如 2024-2025
    pub academic_year: String,
    pub term: i32,
    pub topics: Vec<CurriculumTopic>,
    pub status: PlanStatus,
    pub created_by: i64,
    pub reviewer_id: Option<i64>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_transitions() {
        assert!(PlanStatus::Draft.can_transition_to(PlanStatus::Submitted));
        assert!(PlanStatus::Rejected.can_transition_to(PlanStatus::Submitted));
        assert!(PlanStatus::Submitted.can_transition_to(PlanStatus::Approved));
        assert!(PlanStatus::Submitted.can_transition_to(PlanStatus::Rejected));

        assert!(!PlanStatus::Draft.can_transition_to(PlanStatus::Approved));
        assert!(!PlanStatus::Approved.can_transition_to(PlanStatus::Submitted));
        assert!(!PlanStatus::Approved.can_transition_to(PlanStatus::Rejected));
        assert!(!PlanStatus::Submitted.can_transition_to(PlanStatus::Submitted));
    }

    #[test]
    fn test_editable_states() {
        assert!(PlanStatus::Draft.is_editable());
        assert!(PlanStatus::Rejected.is_editable());
        assert!(!PlanStatus::Submitted.is_editable());
        assert!(!PlanStatus::Approved.is_editable());
    }
}
