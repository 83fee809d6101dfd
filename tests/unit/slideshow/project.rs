use super::*;
use crate::slideshow::model::{MotionKind, TransitionEffect};

fn basic_project() -> SlideshowProject {
    SlideshowProject {
        canvas: Canvas {
            width: 64,
            height: 36,
        },
        fps: Fps::new(30, 1).unwrap(),
        settings: Settings::default(),
        slides: vec![
            Slide::new("a", "img/a.png", MotionKind::ZoomIn),
            Slide::new("b", "img/b.png", MotionKind::PanLeft),
        ],
        audio: Some(AudioSpec {
            source: "music.mp3".to_string(),
            mode: AudioMode::FadeOut,
        }),
        start_slide: 0,
    }
}

#[test]
fn json_roundtrip() {
    let project = basic_project();
    let s = serde_json::to_string_pretty(&project).unwrap();
    let de: SlideshowProject = serde_json::from_str(&s).unwrap();
    assert_eq!(de, project);
}

#[test]
fn minimal_json_fills_defaults() {
    let de: SlideshowProject = serde_json::from_str(
        r#"{
            "canvas": { "width": 32, "height": 32 },
            "slides": [{ "id": "only", "source": "x.jpg" }]
        }"#,
    )
    .unwrap();
    assert_eq!(de.fps, Fps::default());
    assert_eq!(de.settings.transition_effect, TransitionEffect::Fade);
    assert!(de.audio.is_none());
    de.validate().unwrap();
}

#[test]
fn unknown_fields_are_rejected() {
    let res: Result<SlideshowProject, _> = serde_json::from_str(
        r#"{ "canvas": { "width": 32, "height": 32 }, "slides": [], "bogus": 1 }"#,
    );
    assert!(res.is_err());
}

#[test]
fn validate_rejects_empty_and_duplicate_slides() {
    let mut p = basic_project();
    p.slides.clear();
    assert!(matches!(p.validate(), Err(ReelError::InvalidInput(_))));

    let mut p = basic_project();
    p.slides[1].id = p.slides[0].id.clone();
    assert!(p.validate().is_err());
}

#[test]
fn validate_rejects_escaping_paths_and_bad_start() {
    let mut p = basic_project();
    p.slides[0].source = "../secret.png".to_string();
    assert!(p.validate().is_err());

    let mut p = basic_project();
    p.start_slide = 2;
    assert!(p.validate().is_err());
}

#[test]
fn normalize_rel_path_cleans_separators() {
    assert_eq!(normalize_rel_path("./img\\a.png").unwrap(), "img/a.png");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}
