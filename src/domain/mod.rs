//! Core business types: the fee calculator and the domain error taxonomy.

pub mod error;
pub mod tariff;

pub use error::{DomainError, DomainResult};
pub use tariff::{
    compute_fee, format_amount, BillingMode, StayInterval, TariffProfile, TariffRegistry,
};
