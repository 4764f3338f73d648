//! iseven library entry points.
//!
//! This crate exposes the parity predicate used by the HTTP service. Higher
//! level consumers (the service crates) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod parity;

pub use error::{Error, Result};
pub use parity::{is_even, Evaluator, NegativePolicy};
