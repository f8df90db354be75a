//! Parley Common - Shared types and utilities for the parley chat service.
//!
//! This crate provides:
//! - Configuration types for the chat server
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{ChatConfig, ContextMode, InferenceConfig, ObservabilityConfig};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
