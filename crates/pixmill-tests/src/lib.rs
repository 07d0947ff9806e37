//! Integration tests for the pixmill crates.
//!
//! These tests exercise cross-crate flows — codec boundary into buffer
//! into transformations and back — rather than single-module behavior,
//! which lives in each crate's unit tests.
