//! Math utilities and types
//!
//! Layout works in 2D font units, so only the 2D vector type is exposed.

pub use nalgebra::Vector2;

/// 2D vector type used for pen positions
pub type Vec2 = Vector2<f32>;
