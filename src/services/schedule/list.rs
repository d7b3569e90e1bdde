use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::ScheduleService;
use crate::models::{
    ApiResponse,
    schedule::{
        entities::ScheduleEntry,
        requests::{ScheduleListParams, ScheduleQuery},
        responses::ScheduleListResponse,
    },
};
use crate::services::permissions::{current_user, internal_error, visible_subject_ids};

pub async fn list_schedule(
    service: &ScheduleService,
    params: ScheduleListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let visible = match visible_subject_ids(&storage, &user).await {
        Ok(visible) => visible,
        Err(resp) => return Ok(resp),
    };

    // 指定课程时与可见范围取交集
    let subject_ids = match (visible, params.subject_id) {
        (None, None) => None,
        (None, Some(id)) => Some(vec![id]),
        (Some(ids), None) => Some(ids),
        (Some(ids), Some(id)) => Some(ids.into_iter().filter(|v| *v == id).collect()),
    };

    let items = match storage
        .list_schedule_items(ScheduleQuery {
            subject_ids,
            day_of_week: params.day_of_week,
            room: None,
        })
        .await
    {
        Ok(items) => items,
        Err(e) => return Ok(internal_error("Failed to list schedule", e)),
    };

    let mut subject_ids: Vec<i64> = items.iter().map(|i| i.subject_id).collect();
    subject_ids.sort_unstable();
    subject_ids.dedup();
    let subjects: HashMap<i64, _> = match storage.get_subjects_by_ids(&subject_ids).await {
        Ok(subjects) => subjects.into_iter().map(|s| (s.id, s)).collect(),
        Err(e) => return Ok(internal_error("Failed to load subjects", e)),
    };

    let items = items
        .into_iter()
        .filter_map(|item| {
            let subject = subjects.get(&item.subject_id)?;
            Some(ScheduleEntry {
                subject_code: subject.code.clone(),
                subject_name: subject.name.clone(),
                item,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ScheduleListResponse { items },
        "获取课表成功",
    )))
}
