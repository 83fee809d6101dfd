use super::*;
use crate::foundation::core::Point;

const FRAME: Size = Size::new(1280.0, 720.0);

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn none_is_identity_at_every_progress() {
    for p in [0.0, 0.5, 1.0] {
        assert_eq!(
            motion_at(MotionKind::None, p, FRAME),
            MotionTransform::IDENTITY
        );
    }
}

#[test]
fn zooms_hit_documented_endpoints() {
    assert!(approx(motion_at(MotionKind::ZoomIn, 0.0, FRAME).scale, 1.0));
    assert!(approx(motion_at(MotionKind::ZoomIn, 1.0, FRAME).scale, 1.15));
    assert!(approx(motion_at(MotionKind::ZoomOut, 0.0, FRAME).scale, 1.15));
    assert!(approx(motion_at(MotionKind::ZoomOut, 1.0, FRAME).scale, 1.0));
}

#[test]
fn zoom_in_strictly_increases_and_zoom_out_strictly_decreases() {
    let samples = [0.0, 0.25, 0.5, 0.75, 1.0];
    for w in samples.windows(2) {
        let a = motion_at(MotionKind::ZoomIn, w[0], FRAME).scale;
        let b = motion_at(MotionKind::ZoomIn, w[1], FRAME).scale;
        assert!(a < b);
        let a = motion_at(MotionKind::ZoomOut, w[0], FRAME).scale;
        let b = motion_at(MotionKind::ZoomOut, w[1], FRAME).scale;
        assert!(a > b);
    }
}

#[test]
fn pans_move_in_their_named_direction() {
    let left0 = motion_at(MotionKind::PanLeft, 0.0, FRAME);
    let left1 = motion_at(MotionKind::PanLeft, 1.0, FRAME);
    assert!(approx(left0.dx, 64.0));
    assert!(approx(left1.dx, -64.0));
    assert!(approx(motion_at(MotionKind::PanLeft, 0.5, FRAME).dx, 0.0));
    assert!(approx(left0.scale, BASE_SCALE));

    let right = motion_at(MotionKind::PanRight, 1.0, FRAME);
    assert!(approx(right.dx, 64.0));
    assert_eq!(right.dy, 0.0);

    let up = motion_at(MotionKind::PanUp, 1.0, FRAME);
    assert!(approx(up.dy, -36.0));
    let down = motion_at(MotionKind::PanDown, 1.0, FRAME);
    assert!(approx(down.dy, 36.0));
    assert_eq!(down.dx, 0.0);
}

#[test]
fn rotate_sweeps_two_degrees_around_zero() {
    let a = motion_at(MotionKind::Rotate, 0.0, FRAME);
    let b = motion_at(MotionKind::Rotate, 0.5, FRAME);
    let c = motion_at(MotionKind::Rotate, 1.0, FRAME);
    assert!(approx(a.rotation_rad, -1f64.to_radians()));
    assert!(approx(b.rotation_rad, 0.0));
    assert!(approx(c.rotation_rad, 1f64.to_radians()));
    assert!(approx(b.scale, ROTATE_SCALE));
}

#[test]
fn transform_is_deterministic_for_all_kinds() {
    let image = Size::new(800.0, 600.0);
    for kind in MotionKind::ALL {
        for p in [0.0, 0.5, 1.0] {
            assert_eq!(
                transform(kind, p, FRAME, image),
                transform(kind, p, FRAME, image)
            );
        }
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(
        motion_at(MotionKind::ZoomIn, 7.0, FRAME),
        motion_at(MotionKind::ZoomIn, 1.0, FRAME)
    );
    assert_eq!(
        motion_at(MotionKind::ZoomIn, f64::NAN, FRAME),
        motion_at(MotionKind::ZoomIn, 0.0, FRAME)
    );
}

#[test]
fn cover_fit_picks_axis_by_relative_aspect() {
    // Wider than 16:9: fit by height.
    let wide = cover_size(FRAME, Size::new(2000.0, 500.0));
    assert!(approx(wide.height, 720.0));
    assert!(approx(wide.width, 2880.0));

    // Taller than 16:9: fit by width.
    let tall = cover_size(FRAME, Size::new(600.0, 800.0));
    assert!(approx(tall.width, 1280.0));
    assert!(approx(tall.height, 1280.0 * 800.0 / 600.0));

    assert_eq!(cover_size(FRAME, Size::ZERO), FRAME);
}

#[test]
fn placement_covers_frame_and_is_centered() {
    let image = Size::new(640.0, 360.0);
    let pl = transform(MotionKind::ZoomIn, 1.0, FRAME, image);
    assert!(pl.rect.x0 <= 0.0 && pl.rect.y0 <= 0.0);
    assert!(pl.rect.x1 >= FRAME.width && pl.rect.y1 >= FRAME.height);
    assert!(approx(pl.rect.center().x, 640.0));
    assert!(approx(pl.rect.center().y, 360.0));
}

#[test]
fn pans_never_reveal_the_background() {
    let image = Size::new(1920.0, 1080.0);
    for kind in [
        MotionKind::PanLeft,
        MotionKind::PanRight,
        MotionKind::PanUp,
        MotionKind::PanDown,
    ] {
        for p in [0.0, 0.5, 1.0] {
            let r = transform(kind, p, FRAME, image).rect;
            assert!(r.x0 <= 0.0 && r.y0 <= 0.0, "{kind:?} at {p}");
            assert!(r.x1 >= FRAME.width && r.y1 >= FRAME.height, "{kind:?} at {p}");
        }
    }
}

#[test]
fn affine_maps_image_corners_onto_placement_rect() {
    let image = Size::new(320.0, 180.0);
    let pl = transform(MotionKind::PanRight, 0.25, FRAME, image);
    let a = pl.affine();
    let tl = a * Point::new(0.0, 0.0);
    let br = a * Point::new(320.0, 180.0);
    assert!(approx(tl.x, pl.rect.x0) && approx(tl.y, pl.rect.y0));
    assert!(approx(br.x, pl.rect.x1) && approx(br.y, pl.rect.y1));
}

#[test]
fn rotation_pivots_on_frame_center() {
    let image = Size::new(1280.0, 720.0);
    let pl = transform(MotionKind::Rotate, 1.0, FRAME, image);
    let center_in_image = Point::new(640.0, 360.0);
    let mapped = pl.affine() * center_in_image;
    assert!((mapped.x - 640.0).abs() < 1e-6);
    assert!((mapped.y - 360.0).abs() < 1e-6);
}
