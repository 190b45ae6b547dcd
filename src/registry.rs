use std::fmt;

use tracing::debug;

use crate::bbox::{BBox, Ltwh};
use crate::error::Error;
use crate::label::{Color, ObjectClass};
use crate::track::Track;

/// Advisory audit record for a track entering or leaving the registry.
///
/// Events are for logging and the caller's bookkeeping only; registry
/// correctness never depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Created { identity: u32 },
    Removed { identity: u32 },
}

impl LifecycleEvent {
    #[inline]
    pub fn identity(&self) -> u32 {
        match self {
            LifecycleEvent::Created { identity } => *identity,
            LifecycleEvent::Removed { identity } => *identity,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Created { identity } => {
                write!(f, "target {identity} is now being tracked")
            }
            LifecycleEvent::Removed { identity } => {
                write!(f, "target {identity} left the scene and was removed")
            }
        }
    }
}

/// Insertion-ordered collection of live tracks plus the identity allocator.
///
/// Ordering carries no semantics beyond stable iteration for rendering.
/// The registry is small (tens of tracks), so lookups are linear scans.
pub struct TrackRegistry {
    tracks: Vec<Track>,
    next_identity: u32,
    history_capacity: usize,
}

impl TrackRegistry {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            tracks: Vec::new(),
            next_identity: 0,
            history_capacity,
        }
    }

    /// Register a detection under `identity`.
    ///
    /// An existing identity is only touched when `is_update` is set: the box,
    /// class, and color are overwritten, staleness resets, and the visual
    /// tracker is scheduled for a reseed. A new identity allocates a track
    /// and advances the identity counter past it.
    pub fn insert_or_update(
        &mut self,
        identity: u32,
        bbox: BBox<Ltwh>,
        color: Color,
        class: ObjectClass,
        is_update: bool,
    ) -> Result<Option<LifecycleEvent>, Error> {
        if bbox.is_degenerate() {
            return Err(Error::InvalidGeometry);
        }

        if let Some(idx) = self.find(identity) {
            if !is_update {
                return Err(Error::DuplicateIdentity(identity));
            }

            self.tracks[idx].apply_detection(bbox, color, class);
            debug!(identity, "track corroborated by detection");

            return Ok(None);
        }

        self.tracks
            .push(Track::new(identity, bbox, color, class, self.history_capacity));
        self.next_identity = identity + 1;
        debug!(identity, %class, "track registered");

        Ok(Some(LifecycleEvent::Created { identity }))
    }

    #[inline]
    pub fn find(&self, identity: u32) -> Option<usize> {
        self.tracks.iter().position(|t| t.identity() == identity)
    }

    pub fn remove(&mut self, identity: u32) -> Result<LifecycleEvent, Error> {
        let idx = self.find(identity).ok_or(Error::NotFound(identity))?;

        self.tracks.remove(idx);
        debug!(identity, "track removed");

        Ok(LifecycleEvent::Removed { identity })
    }

    /// Read view shared by association, collision detection, and rendering.
    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Exclusive view for the per-frame update fan-out.
    #[inline]
    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// The identity a brand-new, unmatched detection would receive.
    #[inline]
    pub fn next_identity(&self) -> u32 {
        self.next_identity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop every track, releasing the visual-tracker handles.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TrackRegistry {
        TrackRegistry::new(5)
    }

    fn insert(r: &mut TrackRegistry, id: u32, class: ObjectClass) -> Option<LifecycleEvent> {
        r.insert_or_update(
            id,
            BBox::ltwh(id as f32 * 20.0, 0.0, 10.0, 10.0),
            class.color(),
            class,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_identity_uniqueness() {
        let mut r = registry();
        insert(&mut r, 0, ObjectClass::Person);
        insert(&mut r, 1, ObjectClass::Car);
        insert(&mut r, 2, ObjectClass::Person);
        r.remove(1).unwrap();
        insert(&mut r, 3, ObjectClass::Car);

        let mut ids: Vec<_> = r.tracks().iter().map(|t| t.identity()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), r.len());
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut r = registry();
        insert(&mut r, 0, ObjectClass::Person);
        let before = *r.tracks()[0].bbox();

        let err = r.insert_or_update(
            0,
            BBox::ltwh(50.0, 50.0, 8.0, 8.0),
            ObjectClass::Car.color(),
            ObjectClass::Car,
            false,
        );
        assert!(matches!(err, Err(Error::DuplicateIdentity(0))));

        // The existing track must be untouched.
        assert_eq!(*r.tracks()[0].bbox(), before);
        assert_eq!(r.tracks()[0].class(), ObjectClass::Person);
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let mut r = registry();
        insert(&mut r, 0, ObjectClass::Unknown);

        let event = r
            .insert_or_update(
                0,
                BBox::ltwh(5.0, 5.0, 12.0, 12.0),
                ObjectClass::Person.color(),
                ObjectClass::Person,
                true,
            )
            .unwrap();

        assert!(event.is_none());
        assert_eq!(r.len(), 1);
        assert_eq!(r.tracks()[0].class(), ObjectClass::Person);
        assert_eq!(r.tracks()[0].frames_since_detection(), 0);
    }

    #[test]
    fn test_zero_area_rejected_regardless_of_flag() {
        let mut r = registry();
        for is_update in [false, true] {
            let err = r.insert_or_update(
                0,
                BBox::ltwh(1.0, 1.0, 0.0, 10.0),
                ObjectClass::Person.color(),
                ObjectClass::Person,
                is_update,
            );
            assert!(matches!(err, Err(Error::InvalidGeometry)));
        }
        assert!(r.is_empty());
    }

    #[test]
    fn test_identity_counter_advances() {
        let mut r = registry();
        assert_eq!(r.next_identity(), 0);

        insert(&mut r, 0, ObjectClass::Person);
        assert_eq!(r.next_identity(), 1);

        insert(&mut r, 4, ObjectClass::Car);
        assert_eq!(r.next_identity(), 5);
    }

    #[test]
    fn test_remove_unknown_identity() {
        let mut r = registry();
        assert!(matches!(r.remove(9), Err(Error::NotFound(9))));
    }

    #[test]
    fn test_remove_emits_event() {
        let mut r = registry();
        let created = insert(&mut r, 0, ObjectClass::Person).unwrap();
        assert_eq!(created, LifecycleEvent::Created { identity: 0 });

        let removed = r.remove(0).unwrap();
        assert_eq!(removed, LifecycleEvent::Removed { identity: 0 });
        assert_eq!(removed.identity(), 0);
        assert!(removed.to_string().contains('0'));
        assert!(r.is_empty());
    }
}
