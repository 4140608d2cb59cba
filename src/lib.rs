pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod filter;
pub mod lti;
pub mod output;
pub mod session;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::AppConfig;
pub use error::{LpfError, Result};
