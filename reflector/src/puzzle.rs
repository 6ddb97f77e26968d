use log::info;

use crate::{BeamListener, BeamRegistry, MirrorReflector, PuzzleError, Ray, Reflection, ReflectionCtx};

/// Light reaching the mirror at index `mirror` of a [`Puzzle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncidenceEvent {
    pub mirror: usize,
    pub ray: Ray,
}

impl IncidenceEvent {
    #[inline]
    #[must_use]
    pub const fn new(mirror: usize, ray: Ray) -> Self {
        Self { mirror, ray }
    }
}

/// A puzzle layout: a set of mirrors, and a sequence of incidence events to deliver to them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Puzzle {
    pub mirrors: Vec<MirrorReflector>,
    pub events: Vec<IncidenceEvent>,
}

impl Puzzle {
    #[inline]
    #[must_use]
    pub fn new(mirrors: Vec<MirrorReflector>, events: Vec<IncidenceEvent>) -> Self {
        Self { mirrors, events }
    }

    /// Checks that every event targets an existing mirror.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let count = self.mirrors.len();

        self.events
            .iter()
            .position(|event| event.mirror >= count)
            .map_or(Ok(()), |event| {
                Err(PuzzleError::UnknownMirror {
                    event,
                    mirror: self.events[event].mirror,
                    count,
                })
            })
    }

    /// Delivers every event, in order, to its mirror, and returns what each one did.
    ///
    /// Nothing is delivered if the puzzle fails [validation](Self::validate).
    pub fn replay<R: BeamRegistry, L: BeamListener>(
        &mut self,
        ctx: &mut ReflectionCtx<R, L>,
    ) -> Result<Vec<Reflection>, PuzzleError> {
        self.validate()?;

        let reflections = self
            .events
            .iter()
            .map(|event| self.mirrors[event.mirror].on_light_detected(&event.ray, ctx))
            .collect();

        info!(
            "replayed {} events against {} mirrors",
            self.events.len(),
            self.mirrors.len()
        );

        Ok(reflections)
    }
}
