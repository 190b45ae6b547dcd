use nalgebra as na;

use crate::bbox::{BBox, Ltwh};
use crate::circular_queue::CircularQueue;
use crate::config::TrackerConfig;
use crate::error::Error;
use crate::frame::Frame;
use crate::label::{Color, ObjectClass};
use crate::tracker::{SingleObjectTracker, TrackerBackend};

/// State of one tracked object across frames.
///
/// A track is created by the association engine (or cold-start
/// initialization), mutated once per frame by the orchestrator's update
/// fan-out, and removed by the deletion policy. Exactly one update unit
/// touches a track within a frame, so none of the fields need locking.
pub struct Track {
    identity: u32,
    bbox: BBox<Ltwh>,
    center: na::Point2<f32>,
    class: ObjectClass,
    color: Color,
    velocity: na::Vector2<f32>,
    center_history: CircularQueue<na::Point2<f32>>,
    tracker: Option<Box<dyn SingleObjectTracker>>,
    tracking_started: bool,
    pending_detection_seed: bool,
    frames_since_detection: u32,
    marked_for_deletion: bool,
    confidence: f32,
}

impl Track {
    pub fn new(
        identity: u32,
        bbox: BBox<Ltwh>,
        color: Color,
        class: ObjectClass,
        history_capacity: usize,
    ) -> Self {
        Self {
            identity,
            bbox,
            center: bbox.center(),
            class,
            color,
            velocity: na::Vector2::zeros(),
            center_history: CircularQueue::with_capacity(history_capacity),
            tracker: None,
            tracking_started: false,
            pending_detection_seed: false,
            frames_since_detection: 0,
            marked_for_deletion: false,
            confidence: 0.0,
        }
    }

    #[inline]
    pub fn identity(&self) -> u32 {
        self.identity
    }

    #[inline]
    pub fn bbox(&self) -> &BBox<Ltwh> {
        &self.bbox
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        self.center
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Smoothed displacement per frame, in pixels.
    #[inline]
    pub fn velocity(&self) -> na::Vector2<f32> {
        self.velocity
    }

    /// The velocity rendered as a point (`center + velocity`), the form the
    /// presentation layer draws an arrow head at.
    #[inline]
    pub fn velocity_point(&self) -> na::Point2<f32> {
        self.center + self.velocity
    }

    /// Trailing centers, oldest first.
    #[inline]
    pub fn trajectory(&self) -> impl Iterator<Item = &na::Point2<f32>> {
        self.center_history.iter()
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    #[inline]
    pub fn frames_since_detection(&self) -> u32 {
        self.frames_since_detection
    }

    #[inline]
    pub fn tracking_started(&self) -> bool {
        self.tracking_started
    }

    #[inline]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    /// Overwrite geometry and labeling from a corroborating detection.
    ///
    /// Resets staleness and schedules a visual-tracker reseed for the next
    /// update; velocity and trajectory survive so motion continuity is kept
    /// across detector confirmations.
    pub(crate) fn apply_detection(&mut self, bbox: BBox<Ltwh>, color: Color, class: ObjectClass) {
        self.bbox = bbox;
        self.center = bbox.center();
        self.class = class;
        self.color = color;
        self.pending_detection_seed = true;
        self.frames_since_detection = 0;
    }

    /// One-time visual-tracker initialization, seeded from the current box.
    pub(crate) fn ensure_started(
        &mut self,
        backend: &dyn TrackerBackend,
        frame: &Frame,
    ) -> Result<(), Error> {
        if self.tracking_started {
            return Ok(());
        }

        let mut handle = backend.create();
        handle.start_track(frame, &self.bbox)?;

        self.tracker = Some(handle);
        self.tracking_started = true;

        Ok(())
    }

    /// Per-frame position update.
    ///
    /// Reseed the visual tracker when a detection arrived since the last
    /// frame, otherwise run the incremental visual update; then refresh the
    /// motion estimate and the deletion eligibility. On failure the track is
    /// left exactly as it was for this cycle.
    pub(crate) fn run_update(&mut self, frame: &Frame, config: &TrackerConfig) -> Result<(), Error> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame);
        }

        let handle = self.tracker.as_mut().ok_or(Error::TrackerNotStarted)?;

        if self.pending_detection_seed {
            // The detector already wrote the box; confidence is stale this
            // frame and intentionally left alone.
            handle.start_track(frame, &self.bbox)?;
            self.pending_detection_seed = false;
        } else {
            let update = handle.update(frame)?;
            self.bbox = update.bbox;
            self.confidence = update.confidence;
        }

        self.center = self.bbox.center();
        self.center_history.push(self.center);
        self.calc_velocity();

        self.frames_since_detection += 1;
        self.marked_for_deletion = self.frames_since_detection >= config.stale_frame_limit
            && self.velocity.norm() < config.min_velocity_factor * self.bbox.area();

        Ok(())
    }

    /// Average of the previous estimate and the displacement implied by the
    /// full center window, halving frame-to-frame jitter while still
    /// reacting to sustained drift.
    fn calc_velocity(&mut self) {
        let raw_delta = match (self.center_history.oldest(), self.center_history.newest()) {
            (Some(oldest), Some(newest)) if self.center_history.is_full() => {
                (newest - oldest) * self.center_history.len() as f32
            }
            _ => na::Vector2::zeros(),
        };

        self.velocity = (self.velocity + raw_delta) / 2.0;
    }

    /// Whether the center is still inside `[0, width) x [0, height)`.
    pub fn is_inside_frame(&self, width: u32, height: u32) -> bool {
        let x_inside = self.center.x >= 0.0 && self.center.x < width as f32;
        let y_inside = self.center.y >= 0.0 && self.center.y < height as f32;

        x_inside && y_inside
    }
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("identity", &self.identity)
            .field("bbox", &self.bbox)
            .field("class", &self.class)
            .field("velocity", &self.velocity)
            .field("frames_since_detection", &self.frames_since_detection)
            .field("marked_for_deletion", &self.marked_for_deletion)
            .finish()
    }
}
