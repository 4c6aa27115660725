//! Unit tests for the tasklist module.
//!
//! Tests are organised by layer, covering happy paths, error cases, and
//! edge cases for all public APIs.
