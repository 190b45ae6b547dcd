//! Multi-target tracking manager: reconciles detector output with in-flight
//! tracks, runs the per-target visual updates concurrently, applies the
//! lifecycle/deletion policy, and reports inter-object collisions.

pub mod assoc;
pub mod bbox;
pub mod collision;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod label;
pub mod registry;
pub mod tracker;

mod circular_queue;
mod track;

pub use assoc::Assignment;
pub use collision::CollisionReport;
pub use config::TrackerConfig;
pub use detection::Detection;
pub use frame::Frame;
pub use label::{Color, ObjectClass};
pub use registry::{LifecycleEvent, TrackRegistry};
pub use track::Track;
pub use tracker::{SingleObjectTracker, TrackerBackend, TrackerUpdate};

use bbox::{BBox, Ltwh};
use error::Error;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// The tracking manager an application drives once per captured frame:
/// feed detector output through [`ingest_detections`], advance every track
/// with [`process_frame`], then read the surviving set for rendering and
/// collision reporting.
///
/// [`ingest_detections`]: TrackingSystem::ingest_detections
/// [`process_frame`]: TrackingSystem::process_frame
pub struct TrackingSystem {
    registry: TrackRegistry,
    backend: Box<dyn TrackerBackend>,
    config: TrackerConfig,
    last_event: Option<LifecycleEvent>,
}

impl TrackingSystem {
    pub fn new(backend: Box<dyn TrackerBackend>, config: TrackerConfig) -> Self {
        Self {
            registry: TrackRegistry::new(config.history_capacity),
            backend,
            config,
            last_event: None,
        }
    }

    /// Populate the registry from a cold start, one track per seed box,
    /// identities assigned 0..n in order.
    pub fn initialize(&mut self, targets: &[(BBox<Ltwh>, ObjectClass)]) -> Result<(), Error> {
        for (identity, (bbox, class)) in targets.iter().enumerate() {
            let event = self
                .registry
                .insert_or_update(identity as u32, *bbox, class.color(), *class, false)
                .map_err(|e| Error::InitializationFailed(Box::new(e)))?;

            if let Some(event) = event {
                self.record(event);
            }
        }

        Ok(())
    }

    /// Run association and registry reconciliation for one detector cycle.
    ///
    /// Matched detections overwrite their track in place and schedule a
    /// visual-tracker reseed; unmatched ones spawn new tracks; ambiguous
    /// ones are dropped for the cycle.
    pub fn ingest_detections(&mut self, detections: &[Detection]) -> Result<(), Error> {
        for det in detections {
            let assignment = assoc::associate(det, &self.registry, &self.config);

            let identity = match assignment {
                Assignment::Matched(identity) | Assignment::Fresh(identity) => identity,
                Assignment::Ambiguous => {
                    debug!(class = %det.class, "ambiguous detection dropped");
                    continue;
                }
            };

            let event = self.registry.insert_or_update(
                identity,
                det.bbox().as_ltwh(),
                det.class.color(),
                det.class,
                true,
            )?;

            if let Some(event) = event {
                self.record(event);
            }
        }

        Ok(())
    }

    /// Advance every track by one frame.
    ///
    /// Lazily starts visual tracking for tracks inserted since the last
    /// frame, then fans the update step out across tracks (one unit per
    /// track, joined before anything else looks at the registry), and
    /// finally purges tracks that walked out of the frame or went stale.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame);
        }

        let backend = self.backend.as_ref();
        for track in self.registry.tracks_mut() {
            if let Err(err) = track.ensure_started(backend, frame) {
                warn!(identity = track.identity(), error = %err, "visual tracker start failed");
            }
        }

        // One unit of work per track; collect() is the frame barrier. A
        // failed unit surfaces here without aborting its siblings.
        let config = &self.config;
        let failures: Vec<(u32, Error)> = self
            .registry
            .tracks_mut()
            .par_iter_mut()
            .filter_map(|track| {
                track
                    .run_update(frame, config)
                    .err()
                    .map(|err| (track.identity(), err))
            })
            .collect();

        for (identity, err) in failures {
            warn!(identity, error = %err, "track update failed, state unchanged this frame");
        }

        let (width, height) = frame.dims();
        let doomed: Vec<u32> = self
            .registry
            .tracks()
            .iter()
            .filter(|t| !t.is_inside_frame(width, height) || t.is_marked_for_deletion())
            .map(Track::identity)
            .collect();

        for identity in doomed {
            let event = self.registry.remove(identity)?;
            self.record(event);
        }

        Ok(())
    }

    /// Collision reports for the current track set.
    pub fn detect_collisions(&self) -> Result<Vec<CollisionReport>, Error> {
        if self.registry.is_empty() {
            return Err(Error::EmptyRegistry);
        }

        Ok(collision::detect(self.registry.tracks(), &self.config))
    }

    /// Release every track and its visual-tracker handle. Idempotent.
    pub fn shutdown(&mut self) {
        if !self.registry.is_empty() {
            info!(tracks = self.registry.len(), "shutting down tracking system");
        }

        self.registry.clear();
    }

    /// Read view of the live tracks, in stable insertion order, for the
    /// presentation layer.
    #[inline]
    pub fn tracks(&self) -> &[Track] {
        self.registry.tracks()
    }

    #[inline]
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    /// The most recent lifecycle event, if any.
    #[inline]
    pub fn last_event(&self) -> Option<&LifecycleEvent> {
        self.last_event.as_ref()
    }

    fn record(&mut self, event: LifecycleEvent) {
        info!(%event);
        self.last_event = Some(event);
    }
}
