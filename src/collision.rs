use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::label::ObjectClass;
use crate::track::Track;

/// A geometrically overlapping pair of tracks whose sizes make a real
/// collision plausible, as opposed to mere visual occlusion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CollisionReport {
    pub first: u32,
    pub second: u32,
    /// Midpoint of the two centers, for the presentation layer.
    pub point: (f32, f32),
}

/// Size plausibility for a colliding pair.
///
/// Objects of the same class collide when their areas are within the
/// configured tolerance of each other. A person colliding with a car is
/// plausible when the person's area scaled by the person→car ratio lands
/// within tolerance of the car's area; labels are normalized so the ratio
/// is always applied person→car. `Unknown` never collides.
fn plausible(
    mut area1: f32,
    mut label1: ObjectClass,
    mut area2: f32,
    mut label2: ObjectClass,
    config: &TrackerConfig,
) -> bool {
    if label1 == ObjectClass::Unknown || label2 == ObjectClass::Unknown {
        return false;
    }

    if label1 != label2 && label1 == ObjectClass::Car {
        std::mem::swap(&mut label1, &mut label2);
        std::mem::swap(&mut area1, &mut area2);
    }

    let within = |value: f32, target: f32| {
        value > target * (1.0 - config.collision_area_tolerance)
            && value < target * (1.0 + config.collision_area_tolerance)
    };

    match (label1, label2) {
        (ObjectClass::Person, ObjectClass::Person) => within(area1, area2),
        (ObjectClass::Person, ObjectClass::Car) => {
            within(area1 * config.person_car_area_ratio, area2)
        }
        (ObjectClass::Car, ObjectClass::Car) => within(area1, area2),
        _ => false,
    }
}

/// Pairwise scan over the current track set. Never mutates track state.
pub fn detect(tracks: &[Track], config: &TrackerConfig) -> Vec<CollisionReport> {
    let mut reports = Vec::new();

    for (i, a) in tracks.iter().enumerate() {
        for b in &tracks[i + 1..] {
            let intersects = a.bbox().intersection_area(b.bbox()) > 0.0;

            if intersects
                && plausible(a.bbox().area(), a.class(), b.bbox().area(), b.class(), config)
            {
                let mid = na::center(&a.center(), &b.center());
                reports.push(CollisionReport {
                    first: a.identity(),
                    second: b.identity(),
                    point: (mid.x, mid.y),
                });
            }
        }
    }

    reports
}
