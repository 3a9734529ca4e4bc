// src/scene/resources.rs

use crate::math::error::{GeometryError, GeometryResult};
use crate::math::geometry::visibility::{FaceMode, NoObstaclePolicy, VisibilityOptions};
use crate::math::utils::constants;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Einstellungen für Wandgeometrie und Sichtberechnung
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightParameters {
    // --- Sicht ---
    pub cull_front_faces: bool,
    pub max_view_distance: f32,
    pub near_extension_distance_sq: f32,
    pub no_obstacle_policy: NoObstaclePolicy,

    // --- Wände ---
    pub simplify_tolerance: f32,
    pub tile_size: f32,
}

impl Default for SightParameters {
    fn default() -> Self {
        Self {
            cull_front_faces: false,
            max_view_distance: 10_000.0,
            near_extension_distance_sq: constants::NEAR_EXTENSION_DISTANCE_SQ,
            no_obstacle_policy: NoObstaclePolicy::Empty,

            simplify_tolerance: constants::SIMPLIFY_TOLERANCE,
            tile_size: 1.0,
        }
    }
}

impl SightParameters {
    pub fn validate(&self) -> GeometryResult<()> {
        let positive = [
            ("tile_size", self.tile_size),
            ("max_view_distance", self.max_view_distance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidConfiguration {
                    message: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }

        let non_negative = [
            ("simplify_tolerance", self.simplify_tolerance),
            ("near_extension_distance_sq", self.near_extension_distance_sq),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidConfiguration {
                    message: format!("{name} must be non-negative and finite, got {value}"),
                });
            }
        }

        Ok(())
    }

    pub fn face_mode(&self) -> FaceMode {
        if self.cull_front_faces {
            FaceMode::CullFrontFaces
        } else {
            FaceMode::CullBackFaces
        }
    }

    pub fn visibility_options(&self) -> VisibilityOptions {
        VisibilityOptions {
            face_mode: self.face_mode(),
            max_view_distance: self.max_view_distance,
            near_extension_distance_sq: self.near_extension_distance_sq,
            no_obstacle_policy: self.no_obstacle_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = SightParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.face_mode(), FaceMode::CullBackFaces);
        assert_eq!(params.visibility_options().no_obstacle_policy, NoObstaclePolicy::Empty);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let params = SightParameters {
            tile_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GeometryError::InvalidConfiguration { .. })
        ));

        let params = SightParameters {
            max_view_distance: f32::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = SightParameters {
            simplify_tolerance: -0.1,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_front_face_mode() {
        let params = SightParameters {
            cull_front_faces: true,
            ..Default::default()
        };
        assert_eq!(params.visibility_options().face_mode, FaceMode::CullFrontFaces);
    }
}
