//! # Core Engine Module
//!
//! Shared configuration used by every other subsystem.

pub mod config;
