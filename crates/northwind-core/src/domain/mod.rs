//! # Northwind Domain
//!
//! Transfer objects mirroring one row of the Northwind tables.

pub mod entities;

pub use entities::*;
