//! Shared custom-resource primitives for bucket notification configuration.
//!
//! This crate owns the CloudFormation request/response contract and the
//! desired notification state. It intentionally excludes AWS SDK and Lambda
//! runtime concerns.

pub mod contract;
pub mod notification;
pub mod response;
