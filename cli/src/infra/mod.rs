//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! local and remote transports, key generation, the readiness check, and
//! config and state files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod executor;
pub mod identity;
pub mod keys;
pub mod readiness;
pub mod ssh;
pub mod state;
