use reflector::*;

use core::{f64::consts::TAU, iter};
pub use rand;

/// Half the side of the square that random mirror centers and ray origins are picked from.
pub const MAX_COORD_MAG: Float = 400.;

pub trait Random: Sized {
    /// Draw a value from `rng`.
    ///
    /// Must always return. Types with invalid states resample until they get a valid one.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for Ray {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(rand_vect(rng, MAX_COORD_MAG), rand_dir(rng))
    }
}

impl Random for MirrorReflector {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let size = Vector::new(rng.gen_range(1.0..20.0), rng.gen_range(10.0..120.0));

        Self::new(rand_vect(rng, MAX_COORD_MAG), size).with_rotation(rng.gen_range(0.0..TAU))
    }
}

/// A vector whose coordinates are picked uniformly in `-max_coord_mag..max_coord_mag`
pub fn rand_vect(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Vector {
    // gen() is uniform in 0.0..1.0
    Vector::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}

/// A random, non-zero direction
pub fn rand_dir(rng: &mut (impl rand::Rng + ?Sized)) -> Vector {
    loop {
        let v = rand_vect(rng, 1.0);
        if v.norm() > Float::EPSILON * 8.0 {
            break v;
        }
    }
}

/// A ray landing somewhere on `mirror`'s segment, in a random direction.
pub fn rand_hit(rng: &mut (impl rand::Rng + ?Sized), mirror: &MirrorReflector) -> Ray {
    let (start, end) = mirror.endpoints();
    let t = rng.gen::<Float>();

    Ray::new(start.lerp(&end, t), rand_dir(rng))
}

pub fn gen_rand_mirrors<T: Random>(n: usize, rng: &mut (impl rand::Rng + ?Sized)) -> Vec<T> {
    iter::repeat_with(|| T::random(rng)).take(n).collect()
}

/// A puzzle with `num_mirrors` random mirrors, and `num_events` random hits,
/// each landing on one of them.
pub fn random_puzzle(
    rng: &mut (impl rand::Rng + ?Sized),
    num_mirrors: usize,
    num_events: usize,
) -> Puzzle {
    let mirrors: Vec<MirrorReflector> = gen_rand_mirrors(num_mirrors, rng);

    let events = if mirrors.is_empty() {
        Vec::new()
    } else {
        iter::repeat_with(|| {
            let i = rng.gen_range(0..mirrors.len());
            IncidenceEvent::new(i, rand_hit(rng, &mirrors[i]))
        })
        .take(num_events)
        .collect()
    };

    Puzzle::new(mirrors, events)
}
