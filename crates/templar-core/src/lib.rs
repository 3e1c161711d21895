//! Core contracts for templar.
//!
//! This crate defines the template value model, the value-kind classification
//! used by rule parsing, and the JSON boundary adapter shared by the engine
//! and the CLI.

pub mod error;
pub mod json;
pub mod template;

pub use error::{Error, Result};
pub use json::{parse, stringify, stringify_pretty};
pub use template::{Template, ValueType};
