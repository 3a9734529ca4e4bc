// src/debug/visualization/mod.rs
pub mod polygon;
pub mod svg;
