//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`MorphError`] covers two families of failures:
//! - Authoring errors: scene descriptions that cannot be animated
//!   (incompatible members, degenerate rings, unknown groups)
//! - Settings errors: malformed or unreadable configuration files
//!
//! Numeric edge cases (zero arc length, zero duration, empty queues) are
//! not errors; they degrade to well-defined values instead.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MorphError>`.
//!
//! ```rust,ignore
//! use morphis::errors::Result;
//!
//! fn build() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::AnimationKind;

/// The main error type for the morphing engine.
#[derive(Error, Debug)]
pub enum MorphError {
    // ========================================================================
    // Geometry Errors
    // ========================================================================
    /// A ring handed to the resolver has fewer than two points.
    #[error("Degenerate ring: {context} has {len} point(s), at least 2 are required")]
    DegenerateRing {
        /// Which ring was being resolved
        context: &'static str,
        /// Number of points the ring actually had
        len: usize,
    },

    /// Two meshes cannot be blended vertex-by-vertex.
    #[error("Mesh topology mismatch for '{name}': {before} vertices vs {after} vertices")]
    MeshTopologyMismatch {
        /// Name of the animated member
        name: String,
        /// Vertex count of the "before" mesh
        before: usize,
        /// Vertex count of the "after" mesh
        after: usize,
    },

    // ========================================================================
    // Animation Pairing Errors
    // ========================================================================
    /// A member pair has no animation kind in common.
    #[error("Member '{name}' has no common animation kind: {before:?} into {after:?}")]
    IncompatibleMembers {
        /// Name of the animated member
        name: String,
        /// Kind declared by the "before" member
        before: AnimationKind,
        /// Kind declared by the "after" member
        after: AnimationKind,
    },

    // ========================================================================
    // Group Errors
    // ========================================================================
    /// The requested group does not exist (stale key or unknown name).
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// An operation target does not match the group it is applied to.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// Settings JSON could not be parsed.
    #[error("Settings parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, MorphError>`.
pub type Result<T> = std::result::Result<T, MorphError>;
