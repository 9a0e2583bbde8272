//! Data model types.
//!
//! This module contains the value model:
//! - Kinds (the closed set of variant tags)
//! - Values (one immutable payload per kind)
//! - Arbitrary-precision decimals
//! - The conversion surface shared by every kind

pub mod convert;
pub mod decimal;
pub mod value;

pub use decimal::BigDecimal;
pub use value::{Blob, Kind, Value};
