//! Crash-prediction client and reconciliation
//!
//! The prediction model is an opaque external service: the client posts
//! the rolling history and receives a failure probability plus optional
//! context. Reconciliation merges that probability with the locally
//! computed metric tiers into one display-ready status.

mod client;
mod reconcile;

pub use client::{
    HttpPredictionClient, LastSpike, PredictionApi, PredictionError, PredictionResponse,
};
pub use reconcile::{
    reconcile, status_for, time_frame_for, OverallStatus, ReconciledStatus, MAX_RECOMMENDATIONS,
};
