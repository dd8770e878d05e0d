//! Shutterbug creature generator library
//!
//! Procedurally generated, physics-jointed creatures built from primitive
//! shapes, decorated with eyes, wings and legs, and scored by how close to the
//! frame centre a photo catches them.

pub mod accessory;
pub mod animation;
pub mod bounds;
pub mod chain;
pub mod config;
pub mod constants;
pub mod creature;
pub mod drag;
pub mod error;
pub mod generator;
pub mod graphics;
pub mod photo;
pub mod population;
pub mod primitive;
pub mod scoring;
pub mod shape;
pub mod simulation;
pub mod spawn;
pub mod sprite_cache;
pub mod template;
