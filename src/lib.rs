pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod quiz;
pub mod reports;
pub mod session;

pub use error::{ClientError, ClientResult};
