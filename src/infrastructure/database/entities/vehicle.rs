//! Vehicle entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vehicle lifecycle status within the lot
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VehicleStatus {
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "parked")]
    Parked,
    #[sea_orm(string_value = "exit_requested")]
    ExitRequested,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl Default for VehicleStatus {
    fn default() -> Self {
        Self::Reserved
    }
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Parked => "parked",
            Self::ExitRequested => "exit_requested",
            Self::Delivered => "delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reserved" => Some(Self::Reserved),
            "parked" => Some(Self::Parked),
            "exit_requested" => Some(Self::ExitRequested),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// A vehicle in one of these states occupies (or is about to vacate)
    /// a spot, so its plate cannot be checked in again.
    pub fn is_on_premises(&self) -> bool {
        matches!(self, Self::Parked | Self::ExitRequested)
    }
}

/// Vehicle kind
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VehicleType {
    #[sea_orm(string_value = "car")]
    Car,
    #[sea_orm(string_value = "motorcycle")]
    Motorcycle,
    #[sea_orm(string_value = "van")]
    Van,
    #[sea_orm(string_value = "truck")]
    Truck,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Default for VehicleType {
    fn default() -> Self {
        Self::Car
    }
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
            Self::Van => "van",
            Self::Truck => "truck",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "car" => Some(Self::Car),
            "motorcycle" => Some(Self::Motorcycle),
            "van" => Some(Self::Van),
            "truck" => Some(Self::Truck),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Vehicle model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// License plate, stored uppercase
    pub plate: String,
    pub model: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub vehicle_type: VehicleType,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    /// Key of the pricing profile used at check-out (e.g. "avulso")
    pub tariff_key: String,
    pub status: VehicleStatus,
    /// Spot currently occupied, if parked
    pub spot_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
