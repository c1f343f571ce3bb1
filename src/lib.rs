//! Parking lot management service
//!
//! HTTP API for a small commercial parking lot: vehicle registry, spot
//! allocation, check-in/check-out with fee billing, payments and an
//! operational dashboard. The fee calculator itself is a pure function in
//! [`domain::tariff`]; everything else orchestrates it.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::AppConfig;
pub use domain::{compute_fee, DomainError, DomainResult, StayInterval, TariffProfile};
