//! sleval core — error taxonomy and configuration.

pub mod config;
pub mod error;

pub use config::{parse_list, parse_model_order, EvalConfig};
pub use error::{Error, Result};
