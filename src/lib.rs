//! # Study Planner
//!
//! Distributes the videos of a YouTube playlist across study days.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (videos, day plans, schedules, ids)
//! - **scheduler**: The greedy packing core (time-based and day-count-based)
//! - **fetch**: Playlist resolution via the YouTube Data API
//! - **storage**: Local document store for saved schedules
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod fetch;
pub mod models;
pub mod scheduler;
pub mod storage;

pub use models::*;
