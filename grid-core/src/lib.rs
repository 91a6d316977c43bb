//! Core of the attractor grid: a lattice of cells whose size, rotation,
//! color and shape follow their distance to a draggable attractor.
//!
//! Main components:
//! - [`geometry`] - the unit cuboid cell shape and its cross morph target.
//! - [`lattice`] - cells, their base positions and render state.
//! - [`camera`] - orbit camera, rays and pointer-to-ground projection.
//! - [`drag`] - the attractor drag state machine.
//! - [`solver`] - per-frame influence solve.
//! - [`scheduler`] - the dirty flag deferring solves to the next frame.
//! - [`export`] - OBJ serialization of the current lattice.
//! - [`scene`] - the context object tying everything together.
//! - [`attractor`], [`color`], [`config`], [`types`] - shared data types.

pub mod attractor;
pub mod camera;
pub mod color;
pub mod config;
pub mod drag;
pub mod export;
pub mod geometry;
pub mod lattice;
pub mod scene;
pub mod scheduler;
pub mod solver;
pub mod types;
