//! Store Back Office Platform - Stock Engine
//!
//! The inventory write path: records every change in on-hand quantity,
//! maintains a weighted-average cost per (store, stock-keeping unit), and
//! decomposes sold order lines into the elementary stock consumptions they
//! imply. Invoked in-process by the admin application; HTTP, authorization
//! and presentation live elsewhere.

pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
