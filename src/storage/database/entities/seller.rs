use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Seller database model
///
/// `last_location` holds the encoded point of the most recently accepted
/// sample (see `core::geo::wkb`); it is null until the first sample lands.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sellers")]
pub struct Model {
    /// Opaque seller identity supplied by the caller
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Storefront open/closed flag
    pub is_open: bool,

    /// Encoded last known point (optional)
    pub last_location: Option<Vec<u8>>,

    /// Last mutation timestamp
    pub updated_at: DateTimeUtc,
}

/// Seller entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owns many work sessions
    #[sea_orm(has_many = "super::work_session::Entity")]
    WorkSession,

    /// Owns many location logs
    #[sea_orm(has_many = "super::location_log::Entity")]
    LocationLog,
}

impl Related<super::work_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkSession.def()
    }
}

impl Related<super::location_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
