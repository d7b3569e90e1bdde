//! 教学计划存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::curriculum_plans::{ActiveModel, Column, Entity as CurriculumPlans};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    curriculum::{
        entities::{CurriculumPlan, CurriculumTopic, PlanStatus},
        requests::{CurriculumPlanListQuery, NewCurriculumPlan, UpdateCurriculumPlanRequest},
        responses::CurriculumPlanListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

fn encode_topics(topics: &[CurriculumTopic]) -> Result<String> {
    serde_json::to_string(topics)
        .map_err(|e| EduPortalError::serialization(format!("序列化教学周安排失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建教学计划，初始为草稿
    pub async fn create_curriculum_plan_impl(
        &self,
        plan: NewCurriculumPlan,
    ) -> Result<CurriculumPlan> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(plan.subject_id),
            title: Set(plan.title),
            academic_year: Set(plan.academic_year),
            term: Set(plan.term),
            topics: Set(encode_topics(&plan.topics)?),
            status: Set(PlanStatus::Draft.to_string()),
            created_by: Set(plan.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建教学计划失败: {e}")))?;

        Ok(result.into_plan())
    }

    /// 通过 ID 获取教学计划
    pub async fn get_curriculum_plan_by_id_impl(&self, id: i64) -> Result<Option<CurriculumPlan>> {
        let result = CurriculumPlans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询教学计划失败: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    /// 分页列出教学计划
    pub async fn list_curriculum_plans_with_pagination_impl(
        &self,
        query: CurriculumPlanListQuery,
    ) -> Result<CurriculumPlanListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = CurriculumPlans::find();

        if let Some(subject_ids) = query.visible_subject_ids {
            select = select.filter(Column::SubjectId.is_in(subject_ids));
        }
        if query.approved_only {
            select = select.filter(Column::Status.eq(PlanStatus::Approved.to_string()));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            EduPortalError::database_operation(format!("查询教学计划总数失败: {e}"))
        })?;

        let plans = paginator.fetch_page(page - 1).await.map_err(|e| {
            EduPortalError::database_operation(format!("查询教学计划列表失败: {e}"))
        })?;

        Ok(CurriculumPlanListResponse {
            items: plans.into_iter().map(|m| m.into_plan()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新教学计划内容
    pub async fn update_curriculum_plan_impl(
        &self,
        id: i64,
        update: UpdateCurriculumPlanRequest,
    ) -> Result<Option<CurriculumPlan>> {
        if self.get_curriculum_plan_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }
        if let Some(term) = update.term {
            model.term = Set(term);
        }
        if let Some(topics) = update.topics {
            model.topics = Set(encode_topics(&topics)?);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新教学计划失败: {e}")))?;

        self.get_curriculum_plan_by_id_impl(id).await
    }

    /// 状态流转，仅当当前状态为 from 时生效
    pub async fn transition_curriculum_plan_impl(
        &self,
        id: i64,
        from: PlanStatus,
        to: PlanStatus,
        review: Option<(i64, Option<String>)>,
    ) -> Result<Option<CurriculumPlan>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = CurriculumPlans::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        update = match review {
            Some((reviewer_id, comment)) => update
                .col_expr(Column::ReviewerId, Expr::value(reviewer_id))
                .col_expr(Column::ReviewComment, Expr::value(comment))
                .col_expr(Column::ReviewedAt, Expr::value(now)),
            // 重新提交时清空上一轮审核意见
            None => update
                .col_expr(Column::ReviewerId, Expr::value(Option::<i64>::None))
                .col_expr(Column::ReviewComment, Expr::value(Option::<String>::None))
                .col_expr(Column::ReviewedAt, Expr::value(Option::<i64>::None)),
        };

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EduPortalError::database_operation(format!("更新教学计划状态失败: {e}"))
            })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_curriculum_plan_by_id_impl(id).await
    }

    /// 删除教学计划
    pub async fn delete_curriculum_plan_impl(&self, id: i64) -> Result<bool> {
        let result = CurriculumPlans::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除教学计划失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    fn new_plan(subject_id: i64, created_by: i64) -> NewCurriculumPlan {
        NewCurriculumPlan {
            subject_id,
            title: "Algebra I".to_string(),
            academic_year: "2024-2025".to_string(),
            term: 1,
            topics: vec![
                CurriculumTopic {
                    week: 1,
                    topic: "Linear equations".to_string(),
                    objectives: None,
                },
                CurriculumTopic {
                    week: 2,
                    topic: "Inequalities".to_string(),
                    objectives: Some("Solve and graph".to_string()),
                },
            ],
            created_by,
        }
    }

    #[actix_web::test]
    async fn test_review_workflow() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let director = create_user(&storage, "director", UserRole::Director).await;
        let subject = create_subject(&storage, "ALG", Some(teacher)).await;

        let plan = storage
            .create_curriculum_plan_impl(new_plan(subject, teacher))
            .await
            .unwrap();
        assert_eq!(plan.status, PlanStatus::Draft);
        assert_eq!(plan.topics.len(), 2);

        let submitted = storage
            .transition_curriculum_plan_impl(plan.id, PlanStatus::Draft, PlanStatus::Submitted, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submitted.status, PlanStatus::Submitted);

        // 状态已变化，旧的流转不再生效
        assert!(
            storage
                .transition_curriculum_plan_impl(
                    plan.id,
                    PlanStatus::Draft,
                    PlanStatus::Submitted,
                    None
                )
                .await
                .unwrap()
                .is_none()
        );

        let rejected = storage
            .transition_curriculum_plan_impl(
                plan.id,
                PlanStatus::Submitted,
                PlanStatus::Rejected,
                Some((director, Some("add week 3".to_string()))),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rejected.reviewer_id, Some(director));
        assert_eq!(rejected.review_comment.as_deref(), Some("add week 3"));

        let resubmitted = storage
            .transition_curriculum_plan_impl(
                plan.id,
                PlanStatus::Rejected,
                PlanStatus::Submitted,
                None,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(resubmitted.reviewer_id.is_none());
        assert!(resubmitted.review_comment.is_none());
    }

    #[actix_web::test]
    async fn test_list_and_update() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let math = create_subject(&storage, "MATH", Some(teacher)).await;
        let bio = create_subject(&storage, "BIO", Some(teacher)).await;

        let math_plan = storage
            .create_curriculum_plan_impl(new_plan(math, teacher))
            .await
            .unwrap();
        storage
            .create_curriculum_plan_impl(new_plan(bio, teacher))
            .await
            .unwrap();

        let visible = storage
            .list_curriculum_plans_with_pagination_impl(CurriculumPlanListQuery {
                visible_subject_ids: Some(vec![math]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(visible.pagination.total, 1);

        let approved = storage
            .list_curriculum_plans_with_pagination_impl(CurriculumPlanListQuery {
                approved_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(approved.pagination.total, 0);

        let updated = storage
            .update_curriculum_plan_impl(
                math_plan.id,
                UpdateCurriculumPlanRequest {
                    term: Some(2),
                    topics: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.term, 2);
        assert!(updated.topics.is_empty());
        assert_eq!(updated.title, "Algebra I");

        assert!(storage.delete_curriculum_plan_impl(math_plan.id).await.unwrap());
        assert!(!storage.delete_curriculum_plan_impl(math_plan.id).await.unwrap());
    }
}
