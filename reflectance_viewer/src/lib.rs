//! Renders a small scene of procedural shapes with either the Blinn–Phong or
//! the Cook–Torrance reflectance model on the software rasterizer.

pub mod config;
pub mod frame_loop;
pub mod primitives;
pub mod scene;
pub mod shaders;

pub use config::{ConfigError, ViewerConfig};
pub use frame_loop::{render_frame, render_sequence, FrameClock, FrameLoopError};
pub use scene::Scene;
