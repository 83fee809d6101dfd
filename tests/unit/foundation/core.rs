use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), Fps::default());
}

#[test]
fn integer_fps_hits_whole_seconds() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_to_secs(450), 15.0);
    assert_eq!(fps.frames_to_secs(0), 0.0);
}

#[test]
fn frames_before_excludes_the_bound() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_before(15.0), 450);
    assert_eq!(fps.frames_before(15.01), 451);
    assert_eq!(fps.frames_before(0.0), 0);
    assert_eq!(fps.frames_before(f64::NAN), 0);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    let n = ntsc.frames_before(10.0);
    assert!(ntsc.frames_to_secs(n - 1) < 10.0);
    assert!(ntsc.frames_to_secs(n) >= 10.0);
}

#[test]
fn canvas_validation() {
    assert!(Canvas { width: 64, height: 36 }.validate().is_ok());
    assert!(Canvas { width: 0, height: 36 }.validate().is_err());
    assert!(Canvas { width: 63, height: 36 }.validate().is_err());
    assert!(
        Canvas {
            width: 70_000,
            height: 36
        }
        .validate()
        .is_err()
    );
    assert_eq!(Canvas { width: 4, height: 2 }.rgba_len(), 32);
}
