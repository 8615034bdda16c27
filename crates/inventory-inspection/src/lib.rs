//! Inspection and condition-evaluation engine for apartment inventory walkthroughs.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
