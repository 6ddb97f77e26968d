//! Pure geometry helpers: mirror endpoints and normals, angles of incidence,
//! and the reflection formula.
//!
//! Nothing here is cached. Everything is recomputed from the mirror's current
//! center, size and rotation on every call.

use log::trace;

use crate::{Float, Point, ReflectError, Vector};

/// An incoming light ray.
///
/// Unlike most ray types, the direction is kept exactly as supplied: it is
/// neither normalized nor required to be non-zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The point at which the ray touches the mirror
    pub origin: Point,
    /// The direction the light travels in
    pub direction: Vector,
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Point>, direction: impl Into<Vector>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }
}

/// One of the two sides of a mirror segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// The side facing the first normal, `(ey, -ex)`
    First,
    /// The side facing the second normal, `(-ey, ex)`
    Second,
}

/// How the reflection formula treats the mirror normal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReflectionMode {
    /// Apply [`reflect`] with the raw, segment-length normal.
    ///
    /// This is only a true mirror symmetry when the normal happens to be of unit
    /// length, but it is the behavior existing puzzles were tuned against.
    #[default]
    Inherited,
    /// Normalize the selected normal before reflecting.
    UnitNormal,
}

/// Returns the endpoints `(start, end)` of a segment of length `height`
/// centered at `center` and rotated by `rotation` radians.
///
/// A rotation of `0` yields a vertical segment, with `start` above `end`.
#[inline]
#[must_use]
pub fn mirror_endpoints(center: &Point, height: Float, rotation: Float) -> (Point, Point) {
    let half_height = height / 2.0;

    let (sin, cos) = rotation.sin_cos();
    let offset = Vector::new(half_height * sin, -half_height * cos);

    (center - offset, center + offset)
}

/// Returns the two opposite-facing normals of the segment `[start, end]`.
///
/// They are not normalized: their magnitude is the segment's length.
#[inline]
#[must_use]
pub fn normal_vectors(start: &Point, end: &Point) -> (Vector, Vector) {
    let e = end - start;

    (Vector::new(e.y, -e.x), Vector::new(-e.y, e.x))
}

/// Returns the angle between `incident` and `normal`, in degrees, within `[0, 180]`.
///
/// Fails with [`ReflectError::UndefinedAngle`] if either vector is zero, or if
/// the product of their lengths is not finite (e.g. components around `1e155`).
#[inline]
pub fn angle_of_incidence(incident: &Vector, normal: &Vector) -> Result<Float, ReflectError> {
    let magnitudes = incident.norm() * normal.norm();

    if !magnitudes.is_normal() {
        return Err(ReflectError::UndefinedAngle);
    }

    // rounding may push the cosine slightly outside of acos's domain
    let cos_theta = (incident.dot(normal) / magnitudes).clamp(-1.0, 1.0);

    Ok(cos_theta.acos().to_degrees())
}

/// Reflects `incident` with respect to `normal`: `incident - 2 (incident . normal) normal`.
///
/// `normal` is used as is. The result is only a mirror image of `incident`
/// if `normal` is of unit length.
#[inline]
#[must_use]
pub fn reflect(incident: &Vector, normal: &Vector) -> Vector {
    let d = incident.dot(normal);

    incident - normal * (d + d)
}

/// Returns the first of `normals` (in order) whose angle with `incident` is
/// strictly less than 90 degrees, along with the face it belongs to.
///
/// Normals for which the angle is undefined are skipped.
#[inline]
pub fn select_face(
    incident: &Vector,
    (normal1, normal2): &(Vector, Vector),
) -> Result<(Face, Vector), ReflectError> {
    [(Face::First, normal1), (Face::Second, normal2)]
        .into_iter()
        .find(|(face, normal)| match angle_of_incidence(incident, normal) {
            Ok(angle) => {
                trace!("angle of incidence on {face:?} face: {angle} degrees");
                angle < 90.0
            }
            Err(e) => {
                trace!("skipping {face:?} face: {e}");
                false
            }
        })
        .map(|(face, normal)| (face, *normal))
        .ok_or(ReflectError::NoStruckFace)
}

/// Selects the struck face with [`select_face`], then reflects `incident`
/// with respect to its normal, according to `mode`.
#[inline]
pub fn reflected_direction(
    incident: &Vector,
    normals: &(Vector, Vector),
    mode: ReflectionMode,
) -> Result<(Face, Vector), ReflectError> {
    let (face, normal) = select_face(incident, normals)?;

    let normal = match mode {
        ReflectionMode::Inherited => normal,
        // a struck normal is never zero, `select_face` would have skipped it
        ReflectionMode::UnitNormal => normal.normalize(),
    };

    Ok((face, reflect(incident, &normal)))
}
