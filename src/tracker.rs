use crate::bbox::{BBox, Ltwh};
use crate::error::Error;
use crate::frame::Frame;

/// Result of one incremental visual-tracker step.
#[derive(Debug, Clone, Copy)]
pub struct TrackerUpdate {
    pub bbox: BBox<Ltwh>,
    pub confidence: f32,
}

/// Single-object visual tracker capability, implemented outside the core
/// (e.g. a correlation filter over image patches).
///
/// `start_track` may be called again at any time to reseed the tracker with a
/// detector-supplied box; implementations must tolerate that.
pub trait SingleObjectTracker: Send {
    fn start_track(&mut self, frame: &Frame, bbox: &BBox<Ltwh>) -> Result<(), Error>;

    fn update(&mut self, frame: &Frame) -> Result<TrackerUpdate, Error>;
}

/// Factory handing out fresh tracker handles, one per track.
pub trait TrackerBackend: Send + Sync {
    fn create(&self) -> Box<dyn SingleObjectTracker>;
}

/// Baseline backend: every target is assumed to stay where it was seeded.
///
/// Useful for dry runs and tests; real deployments plug in an actual visual
/// tracker behind [`TrackerBackend`].
#[derive(Debug, Default)]
pub struct StationaryBackend;

impl TrackerBackend for StationaryBackend {
    fn create(&self) -> Box<dyn SingleObjectTracker> {
        Box::new(StationaryTracker { seed: None })
    }
}

pub struct StationaryTracker {
    seed: Option<BBox<Ltwh>>,
}

impl SingleObjectTracker for StationaryTracker {
    fn start_track(&mut self, frame: &Frame, bbox: &BBox<Ltwh>) -> Result<(), Error> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame);
        }

        self.seed = Some(*bbox);
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<TrackerUpdate, Error> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame);
        }

        let bbox = self.seed.ok_or(Error::TrackerNotStarted)?;

        Ok(TrackerUpdate {
            bbox,
            confidence: 1.0,
        })
    }
}
