//! Insurance fundamentals - seeded simulations of five core insurance concepts
//!
//! This library provides:
//! - Law of large numbers: observed vs true claim rate as samples grow
//! - Risk pooling: one year of losses across a pool priced at fair premium
//! - Balance sheet mechanics for a fixed-premium insurer
//! - Premium built from expected loss, expenses and a risk margin
//! - Capital survival: multi-year Monte Carlo solvency with an absorbing ruin state
//!
//! Every computation is a pure function of its parameters and seed. Results carry
//! named statistics plus a chart specification; `report` turns them into text.

pub mod balance_sheet;
pub mod capital;
pub mod config;
pub mod convergence;
pub mod error;
pub mod premium;
pub mod report;
pub mod request;
pub mod result;
pub mod risk_pool;
pub mod seed;
pub mod stats;
pub mod types;

pub use config::Assumptions;
pub use error::{ConfigError, ParameterError};
pub use request::Request;
pub use result::{Chart, Concept, SimulationResult, Statistic};
pub use types::{Seed, SeedOffset};
