//! Database entities module

pub mod check_in;
pub mod check_out;
pub mod parking_spot;
pub mod payment;
pub mod pricing_rule;
pub mod user;
pub mod vehicle;

pub use check_in::Entity as CheckIn;
pub use check_out::Entity as CheckOut;
pub use parking_spot::Entity as ParkingSpot;
pub use payment::Entity as Payment;
pub use pricing_rule::Entity as PricingRule;
pub use user::Entity as User;
pub use vehicle::Entity as Vehicle;
