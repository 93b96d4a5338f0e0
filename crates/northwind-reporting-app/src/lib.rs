//! # Northwind Reporting App
//!
//! Command-line front end for the product reports. Parses a report command,
//! wires the configured report backend and prints one line per product.

pub mod app;
pub mod cli;
pub mod di;
pub mod startup;
