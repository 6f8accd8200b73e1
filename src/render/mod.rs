//! Wheel output surfaces: a standalone SVG document and a vello scene.

pub mod scene;
pub mod svg;
