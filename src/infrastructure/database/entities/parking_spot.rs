//! Parking spot entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parking spot model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_spots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display code, e.g. "TER-03"
    #[sea_orm(unique)]
    pub code: String,
    pub section: String,
    pub floor: i32,
    pub is_occupied: bool,
    pub is_reserved: bool,
    /// Vehicle currently occupying the spot
    pub vehicle_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
