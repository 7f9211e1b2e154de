//! Interactive hole drilling on box meshes using **Constructive Solid Geometry (CSG)**.
//!
//! The crate models a rectangular board as a closed polygon mesh ([`Solid`]) and
//! lets a pointer-driven controller bore cylindrical through-holes into it:
//! a click is resolved to a surface hit by ray casting ([`raycast`]), a cylinder
//! cutter is placed and oriented at the hit ([`cutter`]), and the cutter is
//! subtracted from the board with a BSP-tree boolean ([`solid::bsp`]). The
//! [`DrillController`] owns the gesture state machine and publishes each result
//! as an atomically swapped handle.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading of bulk per-polygon work

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod controller;
pub mod cutter;
pub mod errors;
pub mod float_types;
pub mod raycast;
pub mod shapes;
pub mod solid;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use controller::{BoardConfig, CameraProvider, ConfigSource, DrillController, SceneMutator};
pub use cutter::OrientationPolicy;
pub use errors::CsgError;
pub use raycast::SurfaceHit;
pub use solid::Solid;
pub use solid::vertex::Vertex;
