//! AWS-oriented adapters and the API Gateway handler for the product inventory.
//!
//! This crate owns runtime integration details (the Lambda binary, the
//! DynamoDB store adapter, environment configuration and log setup) and
//! renders `inventory_core` results as API Gateway proxy responses.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod observability;
