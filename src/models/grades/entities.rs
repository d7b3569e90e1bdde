use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 成绩类型
    #[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
    pub enum GradeType("成绩类型") {
        Assignment => "assignment",
        Exam => "exam",
        Quiz => "quiz",
        Final => "final",
    }
}

// 成绩
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub assignment_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub graded_by: Option<i64>,
    pub grade_type: GradeType,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Grade {
    /// 百分制得分
    pub fn percentage(&self) -> f64 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        self.score / self.max_score * 100.0
    }
}

/// 分数必须落在 [0, max_score]，且满分为正
pub fn is_valid_score(score: f64, max_score: f64) -> bool {
    score.is_finite() && max_score.is_finite() && max_score > 0.0 && (0.0..=max_score).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_score() {
        assert!(is_valid_score(0.0, 100.0));
        assert!(is_valid_score(100.0, 100.0));
        assert!(!is_valid_score(100.5, 100.0));
        assert!(!is_valid_score(-1.0, 100.0));
        assert!(!is_valid_score(5.0, 0.0));
        assert!(!is_valid_score(f64::NAN, 10.0));
    }
}
