use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(matches!(
        Canvas::new(0, 10),
        Err(VanishError::InvalidConfiguration(_))
    ));
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 3).unwrap().rgba_len(), 48);
}

#[test]
fn default_canvas_matches_capture_size() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (720, 560));
    assert_eq!(c.center(), Vec2::new(360.0, 280.0));
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn anchored_scale_keeps_anchor_fixed() {
    let t = Transform2D {
        scale: Vec2::new(2.0, 2.0),
        anchor: Vec2::new(5.0, 5.0),
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(5.0, 5.0);
    assert!((p.x - 5.0).abs() < 1e-9);
    assert!((p.y - 5.0).abs() < 1e-9);
}
