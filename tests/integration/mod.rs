//! Integration tests
//!
//! Store-backed tests over an in-memory SQLite database.

mod ingestion_tests;
mod session_tests;
