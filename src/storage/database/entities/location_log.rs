use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location log database model
///
/// One accepted position sample. Immutable once written; rows are never
/// updated or deleted by the tracker (retention is an external concern).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "location_logs")]
pub struct Model {
    /// Log ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Seller this sample belongs to
    pub seller_id: String,

    /// Session the sample was recorded under; null outside an active shift
    pub session_id: Option<Uuid>,

    /// Ingestion timestamp
    pub recorded_at: DateTimeUtc,

    /// Encoded point (see `core::geo::wkb`)
    pub location: Vec<u8>,
}

/// Location log entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Belongs to seller relation
    #[sea_orm(
        belongs_to = "super::seller::Entity",
        from = "Column::SellerId",
        to = "super::seller::Column::Id"
    )]
    Seller,

    /// Belongs to session relation
    #[sea_orm(
        belongs_to = "super::work_session::Entity",
        from = "Column::SessionId",
        to = "super::work_session::Column::Id"
    )]
    WorkSession,
}

impl Related<super::seller::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::work_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
