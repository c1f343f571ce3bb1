//! Endpoint modules, one directory per resource

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod parking;
pub mod payments;
pub mod tariffs;
pub mod users;
pub mod vehicles;
