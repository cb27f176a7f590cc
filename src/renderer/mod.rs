//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

pub mod circle_pipeline;

pub use circle_pipeline::{CircleFrame, CircleRenderState, CircleShape, MAX_CIRCLES};
