//! Behavioural properties of the band chain.

use lanyard::config::RopeConfig;
use lanyard::Rope;
use lanyard::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

fn random_vec(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Move a free particle without leaving it pinned.
fn displace(rope: &mut Rope, index: usize, position: Vec3) {
    rope.pin(index, position);
    rope.unpin(index);
}

/// A random slack chain: both ends pinned closer together than the rest
/// length allows, interior pushed off the straight line.
fn random_chain(rng: &mut StdRng) -> (Rope, Vec3, Vec3) {
    let count = rng.gen_range(3..24);
    let start = random_vec(rng, 3.0);
    let end = start + random_vec(rng, 2.0) + Vec3::new(0.0, -1.0, 0.0);
    let mut rope = Rope::new(start, end, count);
    let end = start.lerp(end, 0.75);
    rope.pin(0, start);
    rope.pin(count - 1, end);

    let jitter = rope.rest_segment_length() * 0.3;
    for i in 1..count - 1 {
        let p = rope.particle(i).position + random_vec(rng, jitter);
        displace(&mut rope, i, p);
    }
    (rope, start, end)
}

#[test]
fn test_pins_survive_relaxation() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let (mut rope, start, end) = random_chain(&mut rng);
        let last = rope.last_index();
        for _ in 0..5 {
            rope.step(DT, Vec3::new(0.0, -9.8, 0.0));
            rope.relax();
            assert_eq!(rope.particle(0).position, start);
            assert_eq!(rope.particle(last).position, end);
        }
    }
}

#[test]
fn test_relax_reduces_segment_error() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let (mut rope, _, _) = random_chain(&mut rng);
        let before = rope.max_segment_error();
        if before < 1e-4 {
            continue;
        }
        rope.relax();
        assert!(
            rope.max_segment_error() < before,
            "error grew from {} to {}",
            before,
            rope.max_segment_error()
        );
    }
}

#[test]
fn test_four_particle_relax_scenario() {
    let top = Vec3::new(0.0, 2.4, 0.0);
    let bottom = Vec3::new(0.6, 0.2, 0.0);
    let mut rope = Rope::new(top, bottom, 4);
    rope.pin(0, top);
    rope.pin(3, bottom);
    assert!((rope.rest_segment_length() - top.distance(bottom) / 3.0).abs() < 1e-6);

    // Sag the interior sideways.
    let p1 = rope.particle(1).position + Vec3::new(0.3, 0.0, 0.1);
    let p2 = rope.particle(2).position + Vec3::new(0.2, -0.1, 0.0);
    displace(&mut rope, 1, p1);
    displace(&mut rope, 2, p2);

    rope.step(DT, Vec3::ZERO);
    let before = rope.max_segment_error();
    rope.relax();
    assert!(rope.max_segment_error() < before);
    assert_eq!(rope.particle(0).position, top);
    assert_eq!(rope.particle(3).position, bottom);
}

#[test]
fn test_pinned_chain_settles() {
    let config = RopeConfig::default();
    let mut rope = Rope::new(config.anchor, config.initial_end, config.particle_count)
        .with_damping(config.damping)
        .with_relaxation_iterations(config.relaxation_iterations);
    let last = rope.last_index();

    let mut displacements = Vec::with_capacity(200);
    for _ in 0..200 {
        rope.step(DT, config.gravity);
        rope.pin(0, config.anchor);
        rope.pin(last, config.initial_end);
        rope.relax();
        displacements.push(rope.total_displacement());
    }

    let peak = displacements.iter().cloned().fold(0.0, f32::max);
    let tail = displacements[190..].iter().sum::<f32>() / 10.0;
    assert!(peak > 0.0);
    assert!(tail < peak * 0.2, "tail {} peak {}", tail, peak);

    // Motion dies down window after window.
    let windows: Vec<f32> = displacements
        .chunks(50)
        .map(|w| w.iter().sum::<f32>() / w.len() as f32)
        .collect();
    for pair in windows.windows(2) {
        assert!(pair[1] <= pair[0], "window averages {:?}", windows);
    }
    assert!(rope.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn test_free_end_swings_back_under_gravity() {
    let anchor = Vec3::new(0.0, 2.4, 0.0);
    let mut rope = Rope::new(anchor, Vec3::new(1.0, 2.4, 0.0), 10);
    rope.pin(0, anchor);
    for _ in 0..30 {
        rope.step(DT, Vec3::new(0.0, -9.8, 0.0));
        rope.pin(0, anchor);
        rope.relax();
    }
    let end = rope.particle(rope.last_index()).position;
    assert!(end.y < 2.4);
    // Length is roughly preserved.
    assert!(end.distance(anchor) <= 1.15);
}
