//! AWS-oriented adapters and handlers for the bucket notification custom resource.
//!
//! This crate owns runtime integration details (the Lambda handler, S3 and
//! callback adapters, configuration and logging) and exposes a single runtime
//! module boundary for the contract, notification and response primitives.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod runtime;
