//! Specular reflection of light rays off movable, rotatable 2D mirror segments.
//!
//! A [`MirrorReflector`] is struck by an incoming [`Ray`], picks the face the
//! ray actually illuminates, and either emits a new [`LightBeam`] into a
//! [`BeamRegistry`], or retargets the beam it emitted previously.

mod beam;
mod config;
mod error;
pub mod geometry;
mod mirror;
mod puzzle;

pub use beam::*;
pub use config::*;
pub use error::*;
pub use geometry::{Face, Ray, ReflectionMode};
pub use mirror::*;
pub use puzzle::*;

pub use nalgebra;

use nalgebra::SVector;

pub type Float = f64;

/// A point in the plane.
pub type Point = SVector<Float, 2>;

/// A (not necessarily unit) vector in the plane.
pub type Vector = SVector<Float, 2>;
