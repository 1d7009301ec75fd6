//! Installer abstraction for language server binaries
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Gate     │────▶│  Installer  │────▶│    Base     │
//! │ (preflight) │     │ (strategy)  │     │ (download,  │
//! └─────────────┘     └─────────────┘     │ extract,run)│
//!                            │            └─────────────┘
//!                            ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Catalog    │     │ Concurrent  │
//!                     │ (listings)  │     │ (two steps) │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`strategy`]: the `Installer` trait every tool implements
//! - [`strategies`]: concrete installers (npm, go, pip, release archives, ...)
//! - [`gate`]: platform, prerequisite and hook checks run before installing
//! - [`base`]: shared download/extract/subprocess primitives
//! - [`archive`]: archive format detection and unpacking
//! - [`catalog`]: release resolution from directory listings
//! - [`concurrent`]: fan-out/fan-in of two cancellable steps
//! - [`context`]: cancellation and output configuration
//! - [`platform`]: OS/architecture model
//! - [`error`]: error taxonomy

pub mod archive;
pub mod base;
pub mod catalog;
pub mod concurrent;
pub mod context;
pub mod error;
pub mod gate;
pub mod platform;
pub mod strategies;
pub mod strategy;

pub use context::{InstallContext, OutputSink};
pub use error::InstallError;
pub use platform::{Arch, Os, Platform};
pub use strategy::{Installer, NO_EXECUTABLE, VERSION_LATEST, VERSION_UNSPECIFIED};
