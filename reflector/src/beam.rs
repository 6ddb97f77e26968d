use core::{fmt, str::FromStr};

use uuid::Uuid;

use crate::{Float, Point, Vector};

/// A stable, unique identifier for a reflected beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeamId(Uuid);

impl BeamId {
    /// Generate a fresh, random identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BeamId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BeamId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Cosmetic attributes stamped on newly generated beams.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamStyle {
    /// RGBA, each component in `0.0..=1.0`
    pub color: [f32; 4],
    pub line_width: Float,
}

impl BeamStyle {
    pub const BLUE: [f32; 4] = [0., 0., 1., 1.];
}

impl Default for BeamStyle {
    #[inline]
    fn default() -> Self {
        Self {
            color: Self::BLUE,
            line_width: 5.,
        }
    }
}

/// A beam of light, emitted by a mirror, starting at `origin` and heading towards `direction`.
#[derive(Clone, Debug, PartialEq)]
pub struct LightBeam {
    id: BeamId,
    pub origin: Point,
    pub direction: Vector,
    pub style: BeamStyle,
}

impl LightBeam {
    /// Creates a beam with a freshly generated identifier and the default style.
    #[inline]
    #[must_use]
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self::with_id(BeamId::new(), origin, direction)
    }

    /// Creates a beam with a known identifier, e. g. one read back from storage.
    #[inline]
    #[must_use]
    pub fn with_id(id: BeamId, origin: Point, direction: Vector) -> Self {
        Self {
            id,
            origin,
            direction,
            style: BeamStyle::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: BeamStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> BeamId {
        self.id
    }
}

/// Retargets an existing beam.
pub trait UpdateBeam {
    fn update_direction_and_origin(&mut self, origin: Point, direction: Vector);
}

impl UpdateBeam for LightBeam {
    #[inline]
    fn update_direction_and_origin(&mut self, origin: Point, direction: Vector) {
        self.origin = origin;
        self.direction = direction;
    }
}

/// The scene-wide collection of beams that mirrors emit into.
///
/// Mirrors only ever hold a [`BeamId`] into this collection, which is free to
/// drop beams at any time. Lookups for dropped beams must return `None`.
pub trait BeamRegistry {
    type Beam: UpdateBeam + ?Sized;

    fn find_beam(&mut self, id: BeamId) -> Option<&mut Self::Beam>;

    fn add_beam(&mut self, beam: LightBeam);
}

impl<R: BeamRegistry + ?Sized> BeamRegistry for &mut R {
    type Beam = R::Beam;

    #[inline]
    fn find_beam(&mut self, id: BeamId) -> Option<&mut Self::Beam> {
        (**self).find_beam(id)
    }

    #[inline]
    fn add_beam(&mut self, beam: LightBeam) {
        (**self).add_beam(beam)
    }
}

impl<R: BeamRegistry + ?Sized> BeamRegistry for Box<R> {
    type Beam = R::Beam;

    #[inline]
    fn find_beam(&mut self, id: BeamId) -> Option<&mut Self::Beam> {
        self.as_mut().find_beam(id)
    }

    #[inline]
    fn add_beam(&mut self, beam: LightBeam) {
        self.as_mut().add_beam(beam)
    }
}

/// Notified whenever a mirror generates a new beam, before it is registered.
pub trait BeamListener {
    fn on_new_beam_generated(&mut self, beam: &mut LightBeam);
}

impl BeamListener for () {
    #[inline]
    fn on_new_beam_generated(&mut self, _beam: &mut LightBeam) {}
}

impl<F: FnMut(&mut LightBeam)> BeamListener for F {
    #[inline]
    fn on_new_beam_generated(&mut self, beam: &mut LightBeam) {
        self(beam)
    }
}

/// An in-memory [`BeamRegistry`], keeping beams in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeamSet {
    beams: Vec<LightBeam>,
}

impl BeamSet {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { beams: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: BeamId) -> Option<&LightBeam> {
        self.beams.iter().find(|beam| beam.id == id)
    }

    /// Removes and returns the beam with the given `id`, if any.
    #[inline]
    pub fn remove_beam(&mut self, id: BeamId) -> Option<LightBeam> {
        self.beams
            .iter()
            .position(|beam| beam.id == id)
            .map(|i| self.beams.remove(i))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &LightBeam> + '_ {
        self.beams.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.beams.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[LightBeam] {
        &self.beams
    }
}

impl BeamRegistry for BeamSet {
    type Beam = LightBeam;

    #[inline]
    fn find_beam(&mut self, id: BeamId) -> Option<&mut LightBeam> {
        self.beams.iter_mut().find(|beam| beam.id == id)
    }

    #[inline]
    fn add_beam(&mut self, beam: LightBeam) {
        self.beams.push(beam);
    }
}

impl FromIterator<LightBeam> for BeamSet {
    fn from_iter<T: IntoIterator<Item = LightBeam>>(iter: T) -> Self {
        Self {
            beams: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BeamSet {
    type Item = &'a LightBeam;
    type IntoIter = core::slice::Iter<'a, LightBeam>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.beams.iter()
    }
}
