//! Cartographer: renders Diplomacy game phases as annotated SVG maps.
//!
//! The core is [`compose`], a pure function from a variant, a phase and
//! three SVG templates to one composed SVG document. Around it sit the
//! board model, the color resolver, the Diplicity API adapters and client,
//! and a small HTTP server.

pub mod board;
pub mod color;
pub mod compose;
pub mod config;
pub mod server;
pub mod svg;
pub mod upstream;

pub use color::{ColorError, ColorResolver};
pub use compose::{compose, ComposeError, MapRenderer};
