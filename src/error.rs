use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("frame is empty or invalid")]
    InvalidFrame,

    #[error("bounding box has zero area")]
    InvalidGeometry,

    #[error("identity {0} already exists")]
    DuplicateIdentity(u32),

    #[error("identity {0} not found")]
    NotFound(u32),

    #[error("cold-start initialization failed")]
    InitializationFailed(#[source] Box<Error>),

    #[error("no tracks in the registry")]
    EmptyRegistry,

    #[error("visual tracker was never started for this track")]
    TrackerNotStarted,
}
