//! passpilot-core: exam question corpus analysis.
//!
//! This crate loads a directory of historical exam questions, builds a
//! semantic index over them, and answers the analytical queries the rest of
//! passpilot builds on: similarity search, topic and marks statistics,
//! pass-strategy planning, and Monte Carlo pass simulation.

pub mod analyzer;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod model;
pub mod planner;
pub mod report;
pub mod simulation;
pub mod statistics;

#[cfg(test)]
pub(crate) mod testing;
