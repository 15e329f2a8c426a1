//! LabDash - home-lab dashboard
//!
//! This library aggregates live statistics from self-hosted services
//! (download client, media managers, indexers, media server) behind a
//! single JSON API and an embedded dashboard page.

pub mod aggregator;
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod widgets;
