// src/math/types/mod.rs
pub mod bounds;
pub mod segment;

pub use bounds::*;
pub use segment::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::Vec2;

// Einheitliche Typen für das gesamte Modul
pub type Point2D = Vec2;

/// Ein geschlossener Punkt-Loop; erster und letzter Punkt sind implizit verbunden.
pub type Path = Vec<Point2D>;
/// Menge von Loops ohne vorgeschriebene Beziehung zueinander.
pub type Paths = Vec<Path>;
