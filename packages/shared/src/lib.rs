//! Shared utilities for Pairchat binaries and tests.

pub mod logger;
pub mod time;
