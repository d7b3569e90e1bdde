use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AdminRequestService;
use crate::models::{
    ApiResponse,
    admin_requests::{
        requests::{AdminRequestListParams, AdminRequestListQuery},
        responses::{AdminRequestListItem, AdminRequestListResponse},
    },
};
use crate::services::permissions::{current_user, internal_error};

/// 管理层查看全部申请，其他人只看自己的
pub async fn list_requests(
    service: &AdminRequestService,
    params: AdminRequestListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let query = AdminRequestListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        requester_id: (!user.role.is_management()).then_some(user.id),
        status: params.status,
        request_type: params.request_type,
    };

    let page = match storage.list_admin_requests_with_pagination(query).await {
        Ok(page) => page,
        Err(e) => return Ok(internal_error("Failed to list requests", e)),
    };

    let mut requester_ids: Vec<i64> = page.items.iter().map(|r| r.requester_id).collect();
    requester_ids.sort_unstable();
    requester_ids.dedup();
    let requesters: HashMap<i64, _> = match storage.get_users_by_ids(&requester_ids).await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.brief())).collect(),
        Err(e) => return Ok(internal_error("Failed to load requesters", e)),
    };

    let items = page
        .items
        .into_iter()
        .map(|item| AdminRequestListItem {
            requester: requesters.get(&item.requester_id).cloned(),
            request: item,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AdminRequestListResponse {
            items,
            pagination: page.pagination,
        },
        "获取申请列表成功",
    )))
}
