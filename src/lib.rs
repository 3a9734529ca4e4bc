// src/lib.rs

//! Sicht- und Verdeckungsgeometrie für ein kachelbasiertes 2D-Spiel:
//! Wandvereinigung, Segment-BVH, Sichtpolygon und Nebel.

pub mod debug;
pub mod math;
pub mod scene;
