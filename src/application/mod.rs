//! Application layer - use cases and orchestration

pub mod services;

pub use services::BillingService;
