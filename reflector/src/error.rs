use thiserror::Error;

use crate::BeamId;

/// Reasons a reflection step did not produce its nominal result.
///
/// These never escape [`MirrorReflector::on_light_detected`](crate::MirrorReflector::on_light_detected),
/// which always completes, but they let callers tell the silent paths apart.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectError {
    /// One of the vectors has zero magnitude, so no angle exists.
    #[error("angle of incidence is undefined for a zero-length vector")]
    UndefinedAngle,

    /// Neither face of the mirror is within 90 degrees of the incident vector.
    #[error("the incident vector does not strike either face of the mirror")]
    NoStruckFace,

    /// The beam a reflecting mirror refers to is no longer registered.
    #[error("beam {0} is not present in the registry")]
    BeamNotFound(BeamId),
}

/// A puzzle layout that can't be replayed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("event {event} targets mirror {mirror}, but the puzzle only has {count} mirrors")]
    UnknownMirror {
        event: usize,
        mirror: usize,
        count: usize,
    },
}
