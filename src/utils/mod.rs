//! Shared utilities
//!
//! Cross-cutting helpers used throughout the tracker.

pub mod error;
