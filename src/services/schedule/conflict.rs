//! 课表冲突检测
//!
//! 同一天内时间重叠，且满足以下任一条件即视为冲突：
//! 同一个非空教室，或两门课程由同一位教师任课。

use actix_web::HttpResponse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    schedule::{
        entities::ScheduleItem, requests::ScheduleQuery, responses::ScheduleConflictResponse,
    },
    subjects::entities::Subject,
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;
use crate::utils::validate::parse_clock_time;

/// 待检查的时间段，分钟数已解析
#[derive(Debug, Clone)]
pub struct Slot<'a> {
    pub exclude_id: Option<i64>,
    pub day_of_week: i32,
    pub start: u32,
    pub end: u32,
    pub room: Option<&'a str>,
    pub teacher_id: Option<i64>,
}

fn bad_time(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ScheduleTimeInvalid, message))
}

/// 校验星期与起止时间，返回 (start, end) 分钟数
pub fn validate_slot(day_of_week: i32, start: &str, end: &str) -> Result<(u32, u32), HttpResponse> {
    if !(1..=7).contains(&day_of_week) {
        return Err(bad_time("day_of_week must be between 1 (Monday) and 7 (Sunday)"));
    }
    let start = parse_clock_time(start).map_err(bad_time)?;
    let end = parse_clock_time(end).map_err(bad_time)?;
    if start >= end {
        return Err(bad_time("start_time must be earlier than end_time"));
    }
    Ok((start, end))
}

fn normalized_room(room: Option<&str>) -> Option<String> {
    room.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_lowercase)
}

/// 在候选条目中找出与 slot 冲突的条目
pub fn find_conflicts(
    slot: &Slot<'_>,
    candidates: Vec<ScheduleItem>,
    subjects: &HashMap<i64, Subject>,
) -> Vec<ScheduleItem> {
    let room = normalized_room(slot.room);
    candidates
        .into_iter()
        .filter(|item| Some(item.id) != slot.exclude_id)
        .filter(|item| item.overlaps(slot.day_of_week, slot.start, slot.end))
        .filter(|item| {
            let same_room = room.is_some() && normalized_room(item.room.as_deref()) == room;
            let same_teacher = slot.teacher_id.is_some()
                && subjects.get(&item.subject_id).and_then(|s| s.teacher_id) == slot.teacher_id;
            same_room || same_teacher
        })
        .collect()
}

/// 有冲突时返回带冲突条目的 409
pub async fn check_conflicts(storage: &Arc<dyn Storage>, slot: &Slot<'_>) -> Result<(), HttpResponse> {
    let candidates = storage
        .list_schedule_items(ScheduleQuery {
            day_of_week: Some(slot.day_of_week),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to load schedule", e))?;

    let mut subject_ids: Vec<i64> = candidates.iter().map(|i| i.subject_id).collect();
    subject_ids.sort_unstable();
    subject_ids.dedup();
    let subjects: HashMap<i64, Subject> = storage
        .get_subjects_by_ids(&subject_ids)
        .await
        .map_err(|e| internal_error("Failed to load subjects", e))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let conflicts = find_conflicts(slot, candidates, &subjects);
    if conflicts.is_empty() {
        return Ok(());
    }
    Err(HttpResponse::Conflict().json(ApiResponse::error(
        ErrorCode::ScheduleConflict,
        ScheduleConflictResponse { conflicts },
        "Schedule item conflicts with existing items",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, subject_id: i64, day: i32, start: &str, end: &str, room: Option<&str>) -> ScheduleItem {
        let now = chrono::Utc::now();
        ScheduleItem {
            id,
            subject_id,
            title: format!("Lesson {id}"),
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: room.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn subject(id: i64, teacher_id: Option<i64>) -> Subject {
        let now = chrono::Utc::now();
        Subject {
            id,
            code: format!("SUBJ-{id}"),
            name: format!("Subject {id}"),
            description: None,
            teacher_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validate_slot() {
        assert_eq!(validate_slot(1, "08:00", "09:30").unwrap(), (480, 570));
        assert!(validate_slot(0, "08:00", "09:00").is_err());
        assert!(validate_slot(8, "08:00", "09:00").is_err());
        assert!(validate_slot(3, "09:00", "09:00").is_err());
        assert!(validate_slot(3, "9:00", "10:00").is_err());
        assert!(validate_slot(3, "23:00", "24:00").is_err());
    }

    #[test]
    fn test_room_and_teacher_conflicts() {
        let subjects: HashMap<i64, Subject> = [subject(1, Some(10)), subject(2, Some(20))]
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let candidates = vec![
            item(1, 1, 1, "08:00", "09:00", Some("A101")),
            item(2, 2, 1, "08:30", "09:30", Some("B202")),
            item(3, 2, 1, "09:00", "10:00", Some("a101 ")),
        ];

        // 同教室重叠
        let slot = Slot {
            exclude_id: None,
            day_of_week: 1,
            start: 500,
            end: 560,
            room: Some("A101"),
            teacher_id: Some(30),
        };
        let ids: Vec<i64> = find_conflicts(&slot, candidates.clone(), &subjects)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        // 同教师重叠，无教室
        let slot = Slot {
            room: None,
            teacher_id: Some(20),
            ..slot
        };
        let ids: Vec<i64> = find_conflicts(&slot, candidates.clone(), &subjects)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);

        // 排除自身，且空教室不参与比较
        let slot = Slot {
            exclude_id: Some(2),
            room: Some("  "),
            teacher_id: None,
            ..slot
        };
        assert!(find_conflicts(&slot, candidates, &subjects).is_empty());
    }
}
