//! Utility functions for export, tables and seeding

pub mod dataframe;
pub mod file_utils;
pub mod misc;

// Re-export commonly used utility functions for convenience
pub use dataframe::{emitter_table, frame_table, on_emitters};
pub use file_utils::*;
pub use misc::*;
