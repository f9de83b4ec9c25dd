//! Shared utility functions.

pub mod stats;
