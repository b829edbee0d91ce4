use super::*;

fn fade(delay: f64) -> Tween<f64> {
    Tween {
        delay,
        duration: 1.0,
        ease: Ease::Linear,
        from: 1.0,
        to: 0.0,
    }
}

#[test]
fn holds_start_value_until_delay_elapses() {
    let t = fade(0.5);
    assert_eq!(t.sample(0.0), 1.0);
    assert_eq!(t.sample(0.5), 1.0);
    assert_eq!(t.sample(1.0), 0.5);
    assert_eq!(t.sample(1.5), 0.0);
    assert_eq!(t.sample(9.0), 0.0);
    assert_eq!(t.end(), 1.5);
}

#[test]
fn ease_shapes_progress() {
    let t = Tween {
        ease: Ease::OutQuad,
        ..fade(0.0)
    };
    // OutQuad(0.5) = 0.75
    assert!((t.sample(0.5) - 0.25).abs() < 1e-12);
}

#[test]
fn validate_rejects_bad_timing() {
    assert!(fade(0.0).validate().is_ok());
    assert!(fade(-0.1).validate().is_err());
    assert!(
        Tween {
            duration: 0.0,
            ..fade(0.0)
        }
        .validate()
        .is_err()
    );
    assert!(fade(f64::NAN).validate().is_err());
}

#[test]
fn surface_state_interpolates_every_channel() {
    let to = SurfaceState {
        opacity: 0.0,
        scale: 2.0,
        rotation_deg: -10.0,
        offset: Vec2::new(100.0, -100.0),
    };
    let mid = <SurfaceState as Lerp>::lerp(&SurfaceState::REST, &to, 0.5);
    assert_eq!(mid.opacity, 0.5);
    assert_eq!(mid.scale, 1.5);
    assert_eq!(mid.rotation_deg, -5.0);
    assert_eq!(mid.offset, Vec2::new(50.0, -50.0));
}

#[test]
fn rest_state_transform_is_identity() {
    let canvas = Canvas::new(10, 10).unwrap();
    let affine = SurfaceState::REST.transform(canvas).to_affine();
    let p = affine * kurbo::Point::new(3.0, 4.0);
    assert!((p.x - 3.0).abs() < 1e-9 && (p.y - 4.0).abs() < 1e-9);
}

#[test]
fn offset_tween_moves_through_the_midpoint() {
    let drift = Tween {
        delay: 0.0,
        duration: 2.0,
        ease: Ease::Linear,
        from: Vec2::ZERO,
        to: Vec2::new(100.0, -100.0),
    };
    assert_eq!(drift.sample(1.0), Vec2::new(50.0, -50.0));
    assert_eq!(
        <Vec2 as Lerp>::lerp(&Vec2::new(2.0, 4.0), &Vec2::new(4.0, 8.0), 0.25),
        Vec2::new(2.5, 5.0)
    );
}
