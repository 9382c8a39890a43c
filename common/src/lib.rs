//! Common utilities for the simulation front-ends
//!
//! Window and GPU surface setup plus the orbital camera used to project the
//! scene onto the screen.

pub mod camera;
pub mod graphics;

pub use camera::*;
pub use graphics::*;
