//! coursewise - course recommendations and GPA calculator for the terminal
//!
//! A step wizard that takes a transcript, asks a few interest questions,
//! collects degree requirements and shows ranked course recommendations
//! from an advisor backend. A separate tab computes semester and cumulative GPA.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive wizard
//! coursewise
//!
//! # Non-interactive run against the sample transcript
//! coursewise run --answer 0=yes --require math=6
//!
//! # One-shot GPA
//! coursewise gpa --grade A:3 --grade B+:4 --current-gpa 3.2 --current-credits 30
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tui;
pub mod wizard;

// Re-export commonly used types
pub use error::{ApiError, WizardError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
