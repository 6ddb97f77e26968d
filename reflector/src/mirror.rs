use log::{debug, warn};

use crate::{
    geometry::{self, Face, Ray},
    BeamId, BeamListener, BeamRegistry, Float, LightBeam, Point, ReflectError, ReflectorConfig,
    StaleBeamPolicy, UpdateBeam, Vector,
};

/// Whether a mirror is currently responsible for a beam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReflectState {
    /// No beam has been emitted yet, or the mirror has been reset.
    #[default]
    Idle,
    /// The mirror emitted the beam with this identifier, and retargets it on every new hit.
    Reflecting(BeamId),
}

/// The collaborators a mirror talks to while handling an incidence event.
///
/// `registry` is usually a `&mut` reference to the scene's beam collection.
#[derive(Debug)]
pub struct ReflectionCtx<R, L = ()> {
    pub registry: R,
    pub listener: L,
}

impl<R: BeamRegistry> ReflectionCtx<R> {
    #[inline]
    #[must_use]
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            listener: (),
        }
    }
}

impl<R, L> ReflectionCtx<R, L> {
    #[inline]
    #[must_use]
    pub fn with_listener<M: BeamListener>(self, listener: M) -> ReflectionCtx<R, M> {
        ReflectionCtx {
            registry: self.registry,
            listener,
        }
    }
}

/// What handling an incidence event did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reflection {
    /// A new beam was generated and registered.
    Created {
        beam: BeamId,
        /// `None` if the ray struck neither face, in which case `direction` is zero
        face: Option<Face>,
        direction: Vector,
    },
    /// The previously emitted beam was retargeted.
    Updated {
        beam: BeamId,
        face: Option<Face>,
        direction: Vector,
    },
    /// The previously emitted beam is gone from the registry, nothing was done.
    Stale(BeamId),
}

impl Reflection {
    #[inline]
    #[must_use]
    pub const fn beam_id(&self) -> BeamId {
        match self {
            Self::Created { beam, .. } | Self::Updated { beam, .. } | Self::Stale(beam) => *beam,
        }
    }

    /// The direction the emitted (or retargeted) beam now has, if any.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Option<&Vector> {
        match self {
            Self::Created { direction, .. } | Self::Updated { direction, .. } => Some(direction),
            Self::Stale(_) => None,
        }
    }
}

/// A movable, rotatable, double-sided mirror segment.
///
/// The segment has the length of the mirror's height, and is vertical when
/// `rotation == 0`. Its endpoints and normals are recomputed on demand, so
/// moving or rotating the mirror is always reflected in the next hit.
#[derive(Clone, Debug, PartialEq)]
pub struct MirrorReflector {
    center: Point,
    /// `(width, height)`
    size: Vector,
    /// In radians
    rotation: Float,
    state: ReflectState,
    config: ReflectorConfig,
}

impl MirrorReflector {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Point>, size: impl Into<Vector>) -> Self {
        Self {
            center: center.into(),
            size: size.into(),
            rotation: 0.,
            state: ReflectState::Idle,
            config: ReflectorConfig::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_rotation(mut self, rotation: Float) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: ReflectorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub const fn center(&self) -> &Point {
        &self.center
    }

    #[inline]
    pub fn set_center(&mut self, center: impl Into<Point>) {
        self.center = center.into();
    }

    /// Moves the mirror by `offset`
    #[inline]
    pub fn translate(&mut self, offset: &Vector) {
        self.center += offset;
    }

    /// `(width, height)`
    #[inline]
    #[must_use]
    pub const fn size(&self) -> &Vector {
        &self.size
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> Float {
        self.size.x
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> Float {
        self.size.y
    }

    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Float {
        self.rotation
    }

    #[inline]
    pub fn set_rotation(&mut self, rotation: Float) {
        self.rotation = rotation;
    }

    /// Rotates the mirror by `angle` radians around its center
    #[inline]
    pub fn rotate(&mut self, angle: Float) {
        self.rotation += angle;
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut ReflectorConfig {
        &mut self.config
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ReflectState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_reflecting(&self) -> bool {
        matches!(self.state, ReflectState::Reflecting(_))
    }

    #[inline]
    #[must_use]
    pub const fn last_reflected_beam_id(&self) -> Option<BeamId> {
        match self.state {
            ReflectState::Idle => None,
            ReflectState::Reflecting(id) => Some(id),
        }
    }

    /// Lets an external controller attach the mirror to a beam, or detach it
    /// (with `None`), which also sets whether it is reflecting.
    #[inline]
    pub fn set_last_reflected_beam_id(&mut self, id: Option<BeamId>) {
        self.state = id.map_or(ReflectState::Idle, ReflectState::Reflecting);
    }

    /// Forget about the last emitted beam. The next hit generates a new one.
    #[inline]
    pub fn reset(&mut self) {
        self.state = ReflectState::Idle;
    }

    /// The endpoints `(start, end)` of this mirror's segment.
    #[inline]
    #[must_use]
    pub fn endpoints(&self) -> (Point, Point) {
        geometry::mirror_endpoints(&self.center, self.height(), self.rotation)
    }

    /// The two (non-unit) normals of this mirror, one per face.
    #[inline]
    #[must_use]
    pub fn normal_vectors(&self) -> (Vector, Vector) {
        let (start, end) = self.endpoints();
        geometry::normal_vectors(&start, &end)
    }

    /// Radius of the circular, touch-sensitive area around the mirror's center.
    #[inline]
    #[must_use]
    pub fn touch_radius(&self) -> Float {
        self.width().max(self.height()) / 2. + self.config.touch_margin
    }

    #[inline]
    #[must_use]
    pub fn contains_touch(&self, point: &Point) -> bool {
        (point - self.center).norm() <= self.touch_radius()
    }

    /// The face struck by `incident`, and the direction it reflects to,
    /// against the mirror's current geometry.
    #[inline]
    pub fn reflected_direction(&self, incident: &Vector) -> Result<(Face, Vector), ReflectError> {
        geometry::reflected_direction(
            incident,
            &self.normal_vectors(),
            self.config.reflection_mode,
        )
    }

    /// Like [`Self::reflected_direction`] but falls back to a zero direction if
    /// the ray doesn't strike the mirror.
    fn outgoing_direction(&self, incident: &Vector) -> (Option<Face>, Vector) {
        match self.reflected_direction(incident) {
            Ok((face, direction)) => (Some(face), direction),
            Err(e) => {
                debug!("{e}, falling back to a zero direction");
                (None, Vector::zeros())
            }
        }
    }

    /// Handles light hitting this mirror at `ray.origin`.
    ///
    /// An idle mirror generates a new beam, hands it to `ctx.listener`, then to
    /// `ctx.registry`, and starts reflecting. A reflecting mirror retargets the
    /// beam it generated instead. If that beam is gone, the mirror's
    /// [`StaleBeamPolicy`] decides between doing nothing and generating a new one.
    ///
    /// A ray that strikes neither face still yields a beam, with a zero direction.
    pub fn on_light_detected<R: BeamRegistry, L: BeamListener>(
        &mut self,
        ray: &Ray,
        ctx: &mut ReflectionCtx<R, L>,
    ) -> Reflection {
        if let ReflectState::Reflecting(id) = self.state {
            match self.update_beam(id, ray, &mut ctx.registry) {
                Ok((face, direction)) => {
                    return Reflection::Updated {
                        beam: id,
                        face,
                        direction,
                    }
                }
                Err(e) => match self.config.stale_beam_policy {
                    StaleBeamPolicy::Ignore => {
                        warn!("{e}, ignoring hit");
                        return Reflection::Stale(id);
                    }
                    StaleBeamPolicy::Recreate => {
                        warn!("{e}, generating a new beam");
                        self.reset();
                    }
                },
            }
        }

        self.emit_beam(ray, ctx)
    }

    fn update_beam<R: BeamRegistry>(
        &self,
        id: BeamId,
        ray: &Ray,
        registry: &mut R,
    ) -> Result<(Option<Face>, Vector), ReflectError> {
        let beam = registry
            .find_beam(id)
            .ok_or(ReflectError::BeamNotFound(id))?;

        let (face, direction) = self.outgoing_direction(&ray.direction);
        beam.update_direction_and_origin(ray.origin, direction);

        debug!(
            "retargeted beam {id}: origin {:?}, direction {:?}",
            ray.origin.as_slice(),
            direction.as_slice()
        );

        Ok((face, direction))
    }

    fn emit_beam<R: BeamRegistry, L: BeamListener>(
        &mut self,
        ray: &Ray,
        ctx: &mut ReflectionCtx<R, L>,
    ) -> Reflection {
        let (face, direction) = self.outgoing_direction(&ray.direction);

        let mut beam = LightBeam::new(ray.origin, direction).with_style(self.config.beam_style);
        ctx.listener.on_new_beam_generated(&mut beam);

        let id = beam.id();
        self.state = ReflectState::Reflecting(id);
        ctx.registry.add_beam(beam);

        debug!(
            "generated beam {id}: origin {:?}, direction {:?}",
            ray.origin.as_slice(),
            direction.as_slice()
        );

        Reflection::Created {
            beam: id,
            face,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn starts_idle() {
        let mirror = MirrorReflector::new([0., 0.], [2., 10.]);

        assert_eq!(mirror.state(), ReflectState::Idle);
        assert!(!mirror.is_reflecting());
        assert_eq!(mirror.last_reflected_beam_id(), None);
    }

    #[test]
    fn beam_id_and_reflecting_flag_move_together() {
        let mut mirror = MirrorReflector::new([0., 0.], [2., 10.]);
        let id = BeamId::new();

        mirror.set_last_reflected_beam_id(Some(id));
        assert!(mirror.is_reflecting());
        assert_eq!(mirror.last_reflected_beam_id(), Some(id));

        mirror.set_last_reflected_beam_id(None);
        assert!(!mirror.is_reflecting());

        mirror.set_last_reflected_beam_id(Some(id));
        mirror.reset();
        assert_eq!(mirror.state(), ReflectState::Idle);
    }

    #[test]
    fn touch_area() {
        let mirror = MirrorReflector::new([5., 5.], [4., 20.]);

        assert_eq!(mirror.touch_radius(), 40.);
        assert!(mirror.contains_touch(&Point::new(45., 5.)));
        assert!(!mirror.contains_touch(&Point::new(45.1, 5.)));

        let tight = mirror.with_config(ReflectorConfig::default().with_touch_margin(0.));
        assert_eq!(tight.touch_radius(), 10.);
    }

    #[test]
    fn geometry_follows_moves_and_rotations() {
        let mut mirror = MirrorReflector::new([0., 0.], [1., 4.]);

        let before = mirror.endpoints();
        assert_eq!(before, mirror.endpoints());
        assert_eq!(mirror.normal_vectors(), mirror.normal_vectors());

        mirror.translate(&Vector::new(3., 0.));
        let (start, end) = mirror.endpoints();
        assert_relative_eq!(start, before.0 + Vector::new(3., 0.));
        assert_relative_eq!(end, before.1 + Vector::new(3., 0.));

        mirror.rotate(FRAC_PI_2);
        let (start, end) = mirror.endpoints();
        assert_relative_eq!(start, Point::new(1., 0.), epsilon = 1e-12);
        assert_relative_eq!(end, Point::new(5., 0.), epsilon = 1e-12);

        let (n1, n2) = mirror.normal_vectors();
        assert_relative_eq!(n1, Vector::new(0., -4.), epsilon = 1e-12);
        assert_relative_eq!(n2, Vector::new(0., 4.), epsilon = 1e-12);
    }

    #[test]
    fn reflection_accessors() {
        let id = BeamId::new();
        let stale = Reflection::Stale(id);
        let updated = Reflection::Updated {
            beam: id,
            face: None,
            direction: Vector::zeros(),
        };

        assert_eq!(stale.beam_id(), id);
        assert_eq!(stale.direction(), None);
        assert_eq!(updated.beam_id(), id);
        assert_eq!(updated.direction(), Some(&Vector::zeros()));
    }
}
