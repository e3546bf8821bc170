use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work session database model
///
/// One contiguous work shift for a seller, bounded by clock-in and
/// clock-out. Invariant: at most one session per seller has a null
/// `end_time` at any time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Session ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Seller this session belongs to
    pub seller_id: String,

    /// Clock-in timestamp
    pub start_time: DateTimeUtc,

    /// Clock-out timestamp; null while the shift is active
    pub end_time: Option<DateTimeUtc>,

    /// Aggregate travel distance, mutated only by recompute
    pub total_distance_km: f64,
}

/// Work session entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Belongs to seller relation
    #[sea_orm(
        belongs_to = "super::seller::Entity",
        from = "Column::SellerId",
        to = "super::seller::Column::Id"
    )]
    Seller,

    /// Owns many location logs
    #[sea_orm(has_many = "super::location_log::Entity")]
    LocationLog,
}

impl Related<super::seller::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::location_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
