//! Core pipeline stages.
//!
//! This module contains:
//! - Stable merging of per-file record sequences into one chronological stream
//! - Run segmentation via annotation change and gap detection
//! - Trailing window selection and per-run summary statistics

pub mod merge;
pub mod segment;
pub mod stats;
pub mod window;

// Re-export commonly used types
pub use merge::merge_sorted;
pub use segment::{segment, Run};
pub use stats::{ChannelMatcher, ChannelSummary};
pub use window::{select_window, summarize_run, RunWindow};
