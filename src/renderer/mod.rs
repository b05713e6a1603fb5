//! Rendering module
//!
//! `scene` builds backend-neutral draw lists from the game; `canvas` paints
//! them onto a browser 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{Color, DrawCmd, Scene, TextAlign, build_scene};
