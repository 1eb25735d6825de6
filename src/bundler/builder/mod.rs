//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that sequences the
//! external packaging tools.
//!
//! # Overview
//!
//! The bundler:
//! 1. Checks that every required tool is installed
//! 2. Cleans stale `build/` and `dist/` directories
//! 3. Builds the `.app` with py2app inside an isolated environment
//! 4. Patches the executable's rpath and re-signs the bundle
//! 5. Moves the bundle to its canonical path
//! 6. Optionally builds a `.dmg` installer
//! 7. Cleans up and returns [`BundledArtifact`] results
//!
//! # Module Organization
//!
//! - [`artifact`] - Final artifact description
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`step`] - Step identities carried by errors
//! - [`tool_detection`] - External tool availability checking

pub mod artifact;
pub mod checksum;
mod orchestrator;
mod step;
pub mod tool_detection;

pub use artifact::{ArtifactKind, BundledArtifact};
pub use orchestrator::Bundler;
pub use step::Step;
