//! murmur — an interactive message sculpture.
//!
//! Short text snippets arrive from an external source, fly into a
//! translucent icosahedron and keep orbiting it. The scene is projected on
//! the CPU and painted with egui; the core is the per-sprite lifecycle
//! state machine in [`anim`].

pub mod anim;
pub mod assets;
pub mod config;
pub mod inbox;
pub mod math;
pub mod scene;
pub mod store;
