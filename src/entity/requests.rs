//! 事务申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requester_id: i64,
    pub request_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub reviewer_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RequesterId",
        to = "super::users::Column::Id"
    )]
    Requester,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_admin_request(self) -> crate::models::admin_requests::entities::AdminRequest {
        use crate::models::admin_requests::entities::{AdminRequest, RequestStatus, RequestType};

        AdminRequest {
            id: self.id,
            requester_id: self.requester_id,
            request_type: self
                .request_type
                .parse::<RequestType>()
                .unwrap_or(RequestType::Other),
            title: self.title,
            description: self.description,
            status: self
                .status
                .parse::<RequestStatus>()
                .unwrap_or(RequestStatus::Pending),
            reviewer_id: self.reviewer_id,
            review_comment: self.review_comment,
            reviewed_at: self.reviewed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
