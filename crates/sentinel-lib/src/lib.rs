//! Core library for the Server Sentinel monitoring daemon
//!
//! This crate provides the core functionality for:
//! - Bounded rolling history of metric samples fed by the live feed
//! - Per-metric status and trend classification
//! - Composite stress estimation across all metrics
//! - Reconciliation with the external crash-prediction endpoint
//! - The polling service that keeps derived state synchronized
//! - Health checks and observability

pub mod buffer;
pub mod engine;
pub mod feed;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod service;

pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{MonitorMetrics, StructuredLogger};
pub use service::{DashboardSnapshot, MonitorService, ServiceConfig};
