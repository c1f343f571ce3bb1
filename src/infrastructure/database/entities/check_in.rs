//! Check-in entity — a vehicle entering the lot

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Check-in model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "check_ins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Printed ticket identifier, e.g. "TKT-1714489305000-A1B2C"
    #[sea_orm(unique)]
    pub ticket_number: String,
    pub vehicle_id: String,
    pub spot_id: Option<String>,
    /// Staff member who parked the vehicle
    pub operator_id: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub expected_exit_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
