//! Version management layer for gem staleness checking
//!
//! This module provides the core functionality for looking up, caching, and
//! comparing the latest versions of monitored gems.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│    Cache    │────▶│   Tracked   │
//! │  (lookup)   │     │ (JSON file) │     │  (latest)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │  Registries │                         │   Compare   │
//! │ (rubygems)  │                         │ (severity)  │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: File-backed latest-version cache with refresh logic
//! - [`compare`]: Severity-aware staleness comparison
//! - [`tracked`]: Packages under monitoring and their selection from config
//! - [`registry`]: Registry trait for looking up latest versions
//! - [`registries`]: Concrete registry implementations (rubygems.org)
//! - [`error`]: Error types for cache and registry operations

pub mod cache;
pub mod compare;
pub mod error;
pub mod registries;
pub mod registry;
pub mod tracked;
