//! Unit tests for vzkit
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod executor_tests;
mod mocks;
mod teardown_tests;
