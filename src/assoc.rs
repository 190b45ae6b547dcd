use tracing::debug;

use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::registry::TrackRegistry;

/// Outcome of matching one detection against the live track set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The detection corroborates an existing track.
    Matched(u32),
    /// The detection overlaps nothing and becomes a new track.
    Fresh(u32),
    /// The detection overlaps something but qualifies for no track (label
    /// mismatch or too far off-center); it is dropped for this cycle.
    Ambiguous,
}

/// Greedy per-detection association.
///
/// A track is a candidate when its intersection-over-max ratio with the
/// region exceeds the overlap threshold and the class labels are compatible
/// (`Unknown` is a wildcard on either side). Among candidates the smallest
/// squared center distance wins; the first candidate additionally has to
/// pass the `region_area / 2` distance gate, later ones only have to beat
/// the current best.
///
/// Not a bipartite optimum: detections are resolved one at a time in feed
/// order, and several detections corroborating the same track overwrite
/// each other last-write-wins.
pub fn associate(det: &Detection, registry: &TrackRegistry, config: &TrackerConfig) -> Assignment {
    let region = det.bbox().as_ltwh();
    let region_area = region.area();
    let dist_thresh = region_area / 2.0;

    let mut any_overlap = false;
    let mut best: Option<(u32, f32)> = None;

    for track in registry.tracks() {
        let inter = track.bbox().intersection_area(&region);
        let overlap = f32::max(inter / track.bbox().area(), inter / region_area);

        if overlap > 0.0 {
            any_overlap = true;
        }

        if overlap > config.overlap_threshold && track.class().matches(det.class) {
            let dist = (track.center() - det.center()).norm_squared();

            match best {
                None if dist < dist_thresh => best = Some((track.identity(), dist)),
                Some((_, min_dist)) if dist < min_dist => best = Some((track.identity(), dist)),
                _ => {}
            }
        }
    }

    match best {
        Some((identity, _)) => {
            debug!(identity, "detection matched existing track");
            Assignment::Matched(identity)
        }
        None if !any_overlap => {
            let identity = registry.next_identity();
            debug!(identity, "detection overlaps nothing, assigning fresh identity");
            Assignment::Fresh(identity)
        }
        None => {
            debug!("detection overlaps tracks but corroborates none, ignoring");
            Assignment::Ambiguous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::label::ObjectClass;

    fn registry_with(boxes: &[(u32, BBox<crate::bbox::Ltwh>, ObjectClass)]) -> TrackRegistry {
        let mut r = TrackRegistry::new(5);
        for (id, bbox, class) in boxes {
            r.insert_or_update(*id, *bbox, class.color(), *class, false)
                .unwrap();
        }
        r
    }

    fn det(x: f32, y: f32, w: f32, h: f32, class: ObjectClass) -> Detection {
        // Detections are center-based.
        Detection::new(x + w / 2.0, y + h / 2.0, w, h, 0.9, class)
    }

    #[test]
    fn test_identical_box_matches_track() {
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Person)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Matched(0));
    }

    #[test]
    fn test_disjoint_detection_gets_fresh_identity() {
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Person)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(200.0, 200.0, 10.0, 10.0, ObjectClass::Car),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Fresh(r.next_identity()));
    }

    #[test]
    fn test_empty_registry_gets_fresh_identity() {
        let r = TrackRegistry::new(5);
        let config = TrackerConfig::default();

        let got = associate(&det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person), &r, &config);
        assert_eq!(got, Assignment::Fresh(0));
    }

    #[test]
    fn test_label_mismatch_is_ambiguous() {
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Car)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Ambiguous);
    }

    #[test]
    fn test_unknown_label_is_wildcard() {
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Unknown)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Matched(0));
    }

    #[test]
    fn test_partial_overlap_is_ambiguous() {
        // Overlap ratio 0.5: neither a candidate nor a fresh object.
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Person)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(5.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Ambiguous);
    }

    #[test]
    fn test_first_candidate_distance_gate() {
        // A small region fully inside a big track: overlap qualifies via
        // inter/region_area = 1.0, but the centers are far apart so the
        // region_area / 2 gate rejects the only candidate.
        let r = registry_with(&[(0, BBox::ltwh(0.0, 0.0, 100.0, 100.0), ObjectClass::Person)]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Ambiguous);
    }

    #[test]
    fn test_closest_candidate_wins() {
        let r = registry_with(&[
            (0, BBox::ltwh(0.5, 0.0, 10.0, 10.0), ObjectClass::Person),
            (1, BBox::ltwh(0.0, 0.0, 10.0, 10.0), ObjectClass::Person),
        ]);
        let config = TrackerConfig::default();

        let got = associate(
            &det(0.0, 0.0, 10.0, 10.0, ObjectClass::Person),
            &r,
            &config,
        );
        assert_eq!(got, Assignment::Matched(1));
    }
}
