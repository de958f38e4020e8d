//! Core data models for the study planner.

mod duration;
mod ids;
mod schedule;
mod video;

pub use duration::*;
pub use ids::*;
pub use schedule::*;
pub use video::*;
