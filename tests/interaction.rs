//! Hover and drag state machine scenarios.

use lanyard::card::{Card, CardMesh};
use lanyard::{BandMaterial, CursorHint, InteractionController, InteractionState, Ray, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn card() -> Card {
    Card::new(CardMesh::cuboid(Vec3::new(1.6, 1.0, 0.04)), Vec3::new(0.6, 0.0, 0.0), 0.0)
}

fn ray_at(x: f32, y: f32) -> Ray {
    Ray::new(Vec3::new(x, y, 6.0), Vec3::NEG_Z)
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Press(f32, f32),
    Move(f32, f32),
    Release,
}

fn random_event(rng: &mut StdRng) -> Event {
    let x = rng.gen_range(-1.0..2.5);
    let y = rng.gen_range(-1.0..1.0);
    match rng.gen_range(0..10) {
        0..=1 => Event::Press(x, y),
        2 => Event::Release,
        _ => Event::Move(x, y),
    }
}

#[test]
fn test_random_event_streams_only_take_legal_transitions() {
    use InteractionState::*;

    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..20 {
        let mut ctl = InteractionController::default();
        let mut card = card();
        let mut drag_offset = None;

        for _ in 0..200 {
            let event = random_event(&mut rng);
            let before = ctl.state();

            match event {
                Event::Press(x, y) => {
                    let ray = ray_at(x, y);
                    let hit = card.raycast(&ray).is_some();
                    let started = ctl.pointer_pressed(Some(&ray), &card);
                    if before != Dragging {
                        assert_eq!(started, hit);
                    } else {
                        assert!(!started);
                    }
                    if started {
                        drag_offset = Some(ctl.drag_offset());
                    }
                }
                Event::Move(x, y) => {
                    let ray = ray_at(x, y);
                    let hit = card.raycast(&ray).is_some();
                    ctl.pointer_moved(Some(&ray), &mut card);
                    match before {
                        Dragging => {
                            let offset = drag_offset.expect("drag started");
                            assert_eq!(ctl.drag_offset(), offset);
                            let pointer_world = ray.point_on_z_plane(ctl.drag_target().unwrap().z + offset.z);
                            let target = ctl.drag_target().unwrap();
                            assert!((target.x - (pointer_world.x - offset.x)).abs() < 1e-3);
                            assert!((target.y - (pointer_world.y - offset.y)).abs() < 1e-3);
                        }
                        _ => assert_eq!(ctl.state(), if hit { Hovering } else { Idle }),
                    }
                }
                Event::Release => ctl.pointer_released(),
            }

            let after = ctl.state();
            let legal = match (before, after, event) {
                (a, b, _) if a == b => true,
                (Idle, Hovering, Event::Move(..)) | (Hovering, Idle, Event::Move(..)) => true,
                (Idle | Hovering, Dragging, Event::Press(..)) => true,
                (Dragging, Idle, Event::Release) => true,
                _ => false,
            };
            assert!(legal, "{:?} -> {:?} on {:?}", before, after, event);
            assert_eq!(ctl.is_dragging(), after == Dragging);
            assert_eq!(ctl.is_hovered(), after == Hovering);
        }
    }
}

#[test]
fn test_press_drag_release_scenario() {
    let mut ctl = InteractionController::default();
    let mut card = card();

    assert!(ctl.pointer_pressed(Some(&ray_at(0.3, -0.2)), &card));
    assert_eq!(ctl.state(), InteractionState::Dragging);
    assert_eq!(ctl.cursor(), CursorHint::Grabbing);
    let offset = ctl.drag_offset();
    assert!((offset - Vec3::new(-0.3, -0.2, 0.02)).length() < 1e-4);

    for x in [0.5, 0.8, 1.1, 1.4] {
        ctl.pointer_moved(Some(&ray_at(x, 0.0)), &mut card);
        assert_eq!(ctl.drag_offset(), offset);
    }
    // Eased toward the pointer but never past it.
    assert!(card.position.x > 0.6);
    assert!(card.position.x < 1.4 + 0.3);

    ctl.pointer_released();
    assert_eq!(ctl.state(), InteractionState::Idle);
    assert_eq!(ctl.drag_offset(), offset);
}

#[test]
fn test_hover_swaps_material_and_back() {
    let mut ctl = InteractionController::default();
    let mut card = card();
    assert_eq!(ctl.band_material(), BandMaterial::base());

    ctl.pointer_moved(Some(&ray_at(0.6, 0.0)), &mut card);
    let glass = ctl.band_material();
    assert_eq!(glass.transmission, 0.6);
    assert_eq!(glass.roughness, 0.06);
    assert_eq!(glass.opacity, 0.96);

    ctl.pointer_moved(None, &mut card);
    assert_eq!(ctl.state(), InteractionState::Idle);
    assert_eq!(ctl.band_material(), BandMaterial::base());
}

#[test]
fn test_move_without_ray_keeps_drag() {
    let mut ctl = InteractionController::default();
    let mut card = card();
    ctl.pointer_pressed(Some(&ray_at(0.6, 0.0)), &card);
    let before = card.position;
    ctl.pointer_moved(None, &mut card);
    assert_eq!(ctl.state(), InteractionState::Dragging);
    assert_eq!(card.position, before);
}
