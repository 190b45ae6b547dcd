use serde_derive::{Deserialize, Serialize};

/// Tunable thresholds for association, deletion, and collision plausibility.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackerConfig {
    /// Intersection-over-max ratio above which a track is an association
    /// candidate (default: 0.9)
    pub overlap_threshold: f32,
    /// Consecutive frames without a corroborating detection before a track
    /// becomes eligible for deletion (default: 12)
    pub stale_frame_limit: u32,
    /// A stale track is deleted once its velocity magnitude drops below
    /// this fraction of its box area (default: 0.01)
    pub min_velocity_factor: f32,
    /// Number of trailing centers kept per track for trajectory rendering
    /// and velocity smoothing (default: 5)
    pub history_capacity: usize,
    /// Relative area tolerance for a plausible collision (default: 0.2)
    pub collision_area_tolerance: f32,
    /// Scale applied to a person's area before comparing against a car's
    /// (default: 31.0)
    pub person_car_area_ratio: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.9,
            stale_frame_limit: 12,
            min_velocity_factor: 0.01,
            history_capacity: 5,
            collision_area_tolerance: 0.2,
            person_car_area_ratio: 31.0,
        }
    }
}
