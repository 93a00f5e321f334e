pub mod auth;
pub mod dashboard;
pub mod policies;
pub mod quiz;
pub mod reports;
pub mod staff;
pub mod tips;
pub mod topics;
pub mod training;
