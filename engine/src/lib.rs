// Engine library root
// Quarterly regional performance: period index, YoY growth, dataset views and the dashboard service.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod periods;
pub mod services;
pub mod views;
