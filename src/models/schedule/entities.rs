use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::validate::parse_clock_time;

// 课表条目，day_of_week 取 1（周一）到 7（周日）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleItem {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 带课程信息的课表条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub item: ScheduleItem,
    pub subject_code: String,
    pub subject_name: String,
}

/// 半开区间 [start, end) 是否相交
pub fn times_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && b_start < a_end
}

impl ScheduleItem {
    /// 与同一天的另一条目是否时间重叠
    pub fn overlaps(&self, day_of_week: i32, start: u32, end: u32) -> bool {
        if self.day_of_week != day_of_week {
            return false;
        }
        match (
            parse_clock_time(&self.start_time),
            parse_clock_time(&self.end_time),
        ) {
            (Ok(s), Ok(e)) => times_overlap(s, e, start, end),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_overlap() {
        // 首尾相接不算冲突
        assert!(!times_overlap(480, 540, 540, 600));
        assert!(times_overlap(480, 541, 540, 600));
        assert!(times_overlap(500, 520, 480, 600));
        assert!(!times_overlap(600, 660, 480, 540));
    }
}
