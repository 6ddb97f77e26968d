use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{rngs::StdRng, SeedableRng};
use reflector::*;
use reflector_random::{gen_rand_mirrors, rand_dir, random_puzzle, Random};

const SAMPLES: usize = 500;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x6d69_7272_6f72)
}

#[test]
fn endpoints_are_centered_and_span_the_height() {
    let mut rng = rng();

    for mirror in gen_rand_mirrors::<MirrorReflector>(SAMPLES, &mut rng) {
        let (start, end) = mirror.endpoints();
        let center = *mirror.center();

        assert_relative_eq!((start + end) / 2., center, epsilon = 1e-9);
        assert_relative_eq!((end - start).norm(), mirror.height(), epsilon = 1e-9);
        assert_relative_eq!(
            (start - center).norm(),
            (end - center).norm(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn normals_are_perpendicular_and_antiparallel() {
    let mut rng = rng();

    for mirror in gen_rand_mirrors::<MirrorReflector>(SAMPLES, &mut rng) {
        let (start, end) = mirror.endpoints();
        let (n1, n2) = mirror.normal_vectors();
        let e = end - start;

        assert_abs_diff_eq!(n1.dot(&e), 0., epsilon = 1e-6);
        assert_abs_diff_eq!(n2.dot(&e), 0., epsilon = 1e-6);
        assert_relative_eq!(n1 + n2, Vector::zeros());
        assert_relative_eq!(n1.norm(), mirror.height(), epsilon = 1e-9);
    }
}

#[test]
fn derivation_is_idempotent() {
    let mut rng = rng();

    for mirror in gen_rand_mirrors::<MirrorReflector>(SAMPLES, &mut rng) {
        assert_eq!(mirror.endpoints(), mirror.endpoints());
        assert_eq!(mirror.normal_vectors(), mirror.normal_vectors());
    }
}

#[test]
fn unit_normal_reflection_preserves_the_angle() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let mirror = MirrorReflector::random(&mut rng);
        let incident = rand_dir(&mut rng);

        let Ok((_, normal)) = geometry::select_face(&incident, &mirror.normal_vectors()) else {
            continue;
        };
        let unit = normal.normalize();
        let reflected = geometry::reflect(&incident, &unit);

        assert_relative_eq!(geometry::reflect(&reflected, &unit), incident, epsilon = 1e-9);
        assert_relative_eq!(reflected.norm(), incident.norm(), epsilon = 1e-9);
        assert_relative_eq!(
            geometry::angle_of_incidence(&incident, &unit).unwrap(),
            180. - geometry::angle_of_incidence(&reflected, &unit).unwrap(),
            // acos is ill-conditioned near 0 and 180 degrees
            epsilon = 1e-4
        );
    }
}

#[test]
fn struck_face_is_always_under_ninety_degrees() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let mirror = MirrorReflector::random(&mut rng);
        let incident = rand_dir(&mut rng);
        let (n1, n2) = mirror.normal_vectors();

        match geometry::select_face(&incident, &(n1, n2)) {
            Ok((Face::First, n)) => {
                assert_eq!(n, n1);
                assert!(geometry::angle_of_incidence(&incident, &n1).unwrap() < 90.);
            }
            Ok((Face::Second, n)) => {
                assert_eq!(n, n2);
                assert!(geometry::angle_of_incidence(&incident, &n1).unwrap() >= 90.);
                assert!(geometry::angle_of_incidence(&incident, &n2).unwrap() < 90.);
            }
            Err(e) => panic!("a random direction should strike a face: {e}"),
        }
    }
}

#[test]
fn random_puzzles_replay_one_beam_per_struck_mirror() {
    let mut rng = rng();
    let mut puzzle = random_puzzle(&mut rng, 12, 64);
    let mut beams = BeamSet::new();

    let reflections = puzzle.replay(&mut ReflectionCtx::new(&mut beams)).unwrap();

    let struck: std::collections::HashSet<_> = puzzle.events.iter().map(|e| e.mirror).collect();

    assert_eq!(reflections.len(), 64);
    assert_eq!(beams.len(), struck.len());
    assert_eq!(
        reflections
            .iter()
            .filter(|r| matches!(r, Reflection::Created { .. }))
            .count(),
        struck.len()
    );

    for (i, mirror) in puzzle.mirrors.iter().enumerate() {
        assert_eq!(mirror.is_reflecting(), struck.contains(&i));
    }
}

#[test]
fn any_ray_yields_a_finite_beam() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let mut mirror = MirrorReflector::random(&mut rng);
        let mut beams = BeamSet::new();

        let reflection =
            mirror.on_light_detected(&Ray::random(&mut rng), &mut ReflectionCtx::new(&mut beams));

        assert!(matches!(reflection, Reflection::Created { .. }));
        assert!(reflection.direction().unwrap().iter().all(|c| c.is_finite()));
        assert_eq!(beams.len(), 1);
    }
}
