//! SERP Brand Landscape - classification share dashboard
//!
//! Loads a CSV of SERP brand classifications and serves four filterable views:
//! state share, brand leaderboards, keyword share and the raw result table.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod stats;

pub use config::DashboardConfig;
pub use dashboard::{compute_view, DashboardParams, DashboardView};
