//! Gameplay tuning. Defaults reproduce the shipped game; a JSON override can be
//! supplied with the `serde_json` feature.

use std::f32::consts::PI;

#[cfg(feature = "serde_json")]
use crate::error::GameError;

/// Terrain shape parameters. Terrain units are viewport-relative: one unit is the
/// smaller of the viewport's width and height.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainParams {
    /// Altitude advanced per centerline point.
    pub point_step: f32,
    /// Std-dev of the centerline random walk step.
    pub drift_sigma: f32,
    pub width_mean: f32,
    pub width_jitter: f32,
    pub rock_size_mean: f32,
    pub rock_size_sigma: f32,
    /// Cross-sections sampled between two centerline points.
    pub samples_per_segment: usize,
    /// Cross-sections per revealed group.
    pub group_size: usize,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            point_step: 0.5,
            drift_sigma: 0.15,
            width_mean: 0.8,
            width_jitter: 0.2,
            rock_size_mean: 0.07,
            rock_size_sigma: 0.02,
            samples_per_segment: 10,
            group_size: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tuning {
    // --- Flight (pixels, seconds) ---
    pub gravity: f32,
    pub max_speed: f32,
    /// Throttle constant; full-throttle acceleration is `thrust²` px/s².
    pub thrust: f32,
    /// Rate at which velocity is pulled onto the wing axis.
    pub wing_blend_rate: f32,
    /// Heading change per second at full stick.
    pub turn_rate: f32,
    pub fuel_burn: f32,
    /// Endless mode: an empty tank is refilled instead of ending the run.
    pub refuel_when_empty: bool,
    /// Endless mode: falling past `out_of_bounds_y` puts the plane back at the origin.
    pub reset_out_of_bounds: bool,
    pub out_of_bounds_y: f32,

    // --- Frame loop ---
    pub max_frame_delta: f32,
    pub title_duration: f32,
    pub altitude_milestone: f32,
    pub exhaust_interval: f32,

    // --- Turrets & projectiles ---
    /// Turret sight range in viewport units.
    pub turret_range: f32,
    pub gatling_arc: f32,
    pub gatling_shot_gap: f32,
    pub gatling_burst: u32,
    pub gatling_cooldown: f32,
    pub gatling_aim_rate: f32,
    pub bullet_speed: f32,
    pub bullet_hit_radius: f32,
    pub anti_air_period: f32,
    pub rocket_speed: f32,
    pub rocket_homing_radius: f32,
    pub rocket_detonate_radius: f32,
    pub rumble_radius: f32,
    pub rumble_duration: f32,
    /// Chance that a revealed terrain group carries a turret.
    pub turret_chance: f32,
    /// Groups revealed before turrets start appearing.
    pub turret_lead_in: usize,

    pub terrain: TerrainParams,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 400.0,
            max_speed: 500.0,
            thrust: 25.0,
            wing_blend_rate: 4.0,
            turn_rate: 2.0 * PI,
            fuel_burn: 0.03,
            refuel_when_empty: true,
            reset_out_of_bounds: true,
            out_of_bounds_y: 1000.0,

            max_frame_delta: 0.1,
            title_duration: 2.0,
            altitude_milestone: 250.0,
            exhaust_interval: 0.2,

            turret_range: 1.0,
            gatling_arc: PI / 6.0,
            gatling_shot_gap: 0.1,
            gatling_burst: 5,
            gatling_cooldown: 1.0,
            gatling_aim_rate: 2.0,
            bullet_speed: 400.0,
            bullet_hit_radius: 20.0,
            anti_air_period: 2.0,
            rocket_speed: 200.0,
            rocket_homing_radius: 250.0,
            rocket_detonate_radius: 50.0,
            rumble_radius: 400.0,
            rumble_duration: 0.4,
            turret_chance: 0.5,
            turret_lead_in: 2,

            terrain: TerrainParams::default(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl Tuning {
    /// Parse overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups_hold_whole_segments() {
        let t = TerrainParams::default();
        assert_eq!(t.group_size % t.samples_per_segment, 0);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 100.0, "terrain": { "group_size": 10 } }"#).unwrap();
        assert_eq!(t.gravity, 100.0);
        assert_eq!(t.max_speed, 500.0);
        assert_eq!(t.terrain.group_size, 10);
        assert_eq!(t.terrain.point_step, 0.5);
        assert!(Tuning::from_json("{").is_err());
    }
}
