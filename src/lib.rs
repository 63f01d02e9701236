//! FitCompanion Library
//!
//! Workout, meal and body progress tracking around a body-metrics calculator.

pub mod ai;
pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod models;
pub mod services;
