//! # Northwind Core
//!
//! Core types, transfer objects, and error definitions for the Northwind
//! data access layer. Every other crate in the workspace builds on the
//! error taxonomy, typed identifiers and [`Lookup`] result defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod lookup;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use lookup::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
