//! ledweave Core - Show Domain Model
//!
//! This crate contains the domain model for ledweave, the networked LED
//! show engine:
//! - Bounds math for spatial normalization
//! - The CIELUV color engine and gradient sampler
//! - The fixture tree with its point and fixture traversals
//! - The timeline scheduler with nested cross-fade compositing
//! - Built-in effects and easing curves
//!
//! The whole pipeline is: show time, to a working-space color per point, to
//! device bytes (encoded by `ledweave-control`).

#![warn(missing_docs)]

use thiserror::Error;

/// Bounds math
pub mod bounds;
/// Device/working color conversions
pub mod color;
/// Easing curves
pub mod ease;
/// Built-in effects
pub mod effects;
/// Fixture tree and traversals
pub mod fixture;
/// Gradient sampler
pub mod gradient;
/// Timeline scheduler
pub mod timeline;

pub use bounds::Bounds;
pub use color::{
    working_to_linear_rgb, working_to_srgb, Channel, ColorConverter, Rgba, Rgba16, Rgba8,
};
pub use effects::{Axis, AxisGradient, Breathe, MirrorGradient, ScrollingGradient, Solid};
pub use fixture::{Fixture, LedPoint};
pub use gradient::{Gradient, GRADIENT_SIZE};
pub use timeline::{BlendMode, Effect, ShadeContext, Span, Timeline, Timing};

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Gradient control points fail validation
    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),

    /// Show graph fails validation
    #[error("Invalid show: {0}")]
    InvalidShow(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
