use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::assets::image::ImageSource;
use crate::audio::envelope::AudioMode;
use crate::audio::track::{AudioSource, AudioTrack, MemoryAudioSource};
use crate::encode::sink::InMemorySink;
use crate::export::context::{CancelToken, PreviewAudio};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::slideshow::model::{MotionKind, Settings, Slide};

const CANVAS: Canvas = Canvas {
    width: 8,
    height: 8,
};

struct MemoryImages(HashMap<String, PreparedImage>);

impl MemoryImages {
    fn solid(entries: &[(&str, [u8; 4])]) -> Self {
        let map = entries
            .iter()
            .map(|(name, rgba)| {
                let img = PreparedImage::from_premul_rgba8(2, 2, rgba.repeat(4)).unwrap();
                (name.to_string(), img)
            })
            .collect();
        Self(map)
    }
}

impl ImageSource for MemoryImages {
    fn load(&self, slide: &Slide) -> ReelResult<PreparedImage> {
        self.0
            .get(&slide.source)
            .cloned()
            .ok_or_else(|| ReelError::decode(format!("no image '{}'", slide.source)))
    }
}

fn slides() -> Vec<Slide> {
    vec![
        Slide::new("a", "a", MotionKind::ZoomIn),
        Slide::new("b", "b", MotionKind::PanLeft),
        Slide::new("c", "c", MotionKind::Rotate),
    ]
}

fn images() -> MemoryImages {
    MemoryImages::solid(&[
        ("a", [255, 0, 0, 255]),
        ("b", [0, 255, 0, 255]),
        ("c", [0, 0, 255, 255]),
    ])
}

fn settings(slide: f64, transition: f64) -> Settings {
    Settings {
        slide_duration_secs: slide,
        transition_duration_secs: transition,
        ..Settings::default()
    }
}

fn fps(n: u32) -> Fps {
    Fps::new(n, 1).unwrap()
}

fn quiet_driver() -> ExportDriver {
    ExportDriver::new(ExportOpts {
        yield_between_frames: false,
        ..ExportOpts::default()
    })
}

fn phases(events: &[ProgressEvent]) -> Vec<ExportPhase> {
    events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Phase(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[test]
fn renders_every_frame_before_the_end() {
    let slides = slides();
    let images = images();
    let ctx = ExportContext::new(&slides, settings(4.0, 1.0), CANVAS, fps(30), &images);
    let mut sink = InMemorySink::new();
    let mut events = Vec::new();

    let outcome = quiet_driver()
        .run(ctx, &mut sink, &mut |e: &ProgressEvent| events.push(e.clone()))
        .unwrap();

    assert_eq!(outcome.frames, 450);
    assert_eq!(outcome.duration_secs, 15.0);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.artifact.frames, 450);
    assert!(!outcome.artifact.has_audio);
    assert_eq!(sink.frames().len(), 450);
    assert_eq!(sink.frames()[449].idx, FrameIndex(449));

    assert_eq!(
        phases(&events),
        vec![
            ExportPhase::Initializing,
            ExportPhase::Rendering,
            ExportPhase::Finalizing,
            ExportPhase::Done
        ]
    );
    let statuses: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Frame(f) => Some(f.status.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(statuses.len(), 450);
    assert_eq!(statuses[0], "1 of 3 (0%)");
    assert_eq!(statuses[449], "3 of 3 (100%)");
    assert_eq!(events.last(), Some(&ProgressEvent::Done { frames: 450 }));
}

#[test]
fn zero_slides_never_start_the_sink() {
    let images = images();
    let ctx = ExportContext::new(&[], Settings::default(), CANVAS, fps(30), &images);
    let mut sink = InMemorySink::new();
    let mut events = Vec::new();
    let mut driver = quiet_driver();

    let err = driver
        .run(ctx, &mut sink, &mut |e: &ProgressEvent| events.push(e.clone()))
        .unwrap_err();

    assert!(matches!(err, ReelError::InvalidInput(_)));
    assert!(sink.config().is_none());
    assert!(phases(&events).is_empty());
    assert!(matches!(events.last(), Some(ProgressEvent::Failed(_))));
    assert_eq!(driver.phase(), ExportPhase::Idle);
}

#[test]
fn broken_image_becomes_a_black_placeholder() {
    let slides = vec![
        Slide::new("a", "a", MotionKind::None),
        Slide::new("gone", "missing", MotionKind::None),
    ];
    let images = images();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.0), CANVAS, fps(10), &images);
    let mut sink = InMemorySink::new();

    let outcome = quiet_driver()
        .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
        .unwrap();

    assert_eq!(outcome.frames, 20);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("gone"));
    let last = &sink.frames()[19].data;
    assert!(last.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn cancelling_mid_render_aborts_without_artifact() {
    let slides = slides();
    let images = images();
    let cancel = CancelToken::new();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.5), CANVAS, fps(10), &images)
        .with_cancel(cancel.clone());
    let mut sink = InMemorySink::new();
    let mut events = Vec::new();
    let mut driver = quiet_driver();

    let err = driver
        .run(ctx, &mut sink, &mut |e: &ProgressEvent| {
            if let ProgressEvent::Frame(f) = e
                && f.frame.0 == 9
            {
                cancel.cancel();
            }
            events.push(e.clone());
        })
        .unwrap_err();

    assert!(matches!(err, ReelError::Cancelled));
    assert!(sink.is_aborted());
    assert!(!sink.is_finished());
    assert!(sink.frames().is_empty());
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ProgressEvent::Done { .. }))
    );
    assert_eq!(
        phases(&events),
        vec![
            ExportPhase::Initializing,
            ExportPhase::Rendering,
            ExportPhase::Failed,
            ExportPhase::Idle
        ]
    );
    assert_eq!(driver.phase(), ExportPhase::Idle);
}

struct FailingSink {
    inner: InMemorySink,
    fail_at: u64,
    aborted: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if idx.0 == self.fail_at {
            return Err(ReelError::encoder("disk full"));
        }
        self.inner.push_frame(idx, frame)
    }

    fn end(&mut self) -> ReelResult<EncodedArtifact> {
        self.inner.end()
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.inner.abort();
    }
}

#[test]
fn sink_failure_is_fatal() {
    let slides = slides();
    let images = images();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.0), CANVAS, fps(10), &images);
    let mut sink = FailingSink {
        inner: InMemorySink::new(),
        fail_at: 5,
        aborted: false,
    };
    let mut events = Vec::new();

    let err = quiet_driver()
        .run(ctx, &mut sink, &mut |e: &ProgressEvent| events.push(e.clone()))
        .unwrap_err();

    assert!(matches!(err, ReelError::Encoder(_)));
    assert!(sink.aborted);
    let failed = events.iter().find_map(|e| match e {
        ProgressEvent::Failed(msg) => Some(msg.clone()),
        _ => None,
    });
    assert!(failed.unwrap().contains("disk full"));
}

#[test]
fn identical_inputs_export_identical_frames() {
    let slides = slides();
    let images = images();
    let mut runs = Vec::new();
    for _ in 0..2 {
        let ctx = ExportContext::new(&slides, settings(1.0, 0.5), CANVAS, fps(12), &images);
        let mut sink = InMemorySink::new();
        quiet_driver()
            .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
            .unwrap();
        runs.push(sink.frames().to_vec());
    }
    assert_eq!(runs[0].len(), 54);
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn zero_transition_never_blends() {
    let slides = slides();
    let images = images();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.0), CANVAS, fps(10), &images);
    let mut sink = InMemorySink::new();
    quiet_driver()
        .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
        .unwrap();

    let center = |i: usize| {
        let d = &sink.frames()[i].data;
        let o = (4 * 8 + 4) * 4;
        [d[o], d[o + 1], d[o + 2]]
    };
    // Every frame shows exactly one pure slide color.
    for i in 0..30 {
        let c = center(i);
        assert_eq!(c.iter().filter(|&&v| v > 250).count(), 1, "frame {i}: {c:?}");
        assert_eq!(c.iter().filter(|&&v| v < 5).count(), 2, "frame {i}: {c:?}");
    }
}

fn tone(secs: u32) -> AudioTrack {
    let rate = 1_000;
    AudioTrack::new(rate, 2, vec![0.5; (rate * secs * 2) as usize]).unwrap()
}

fn staging_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("slidereel_stage_{tag}_{}", std::process::id()))
}

#[test]
fn soundtrack_is_staged_for_the_sink_and_cleaned_up() {
    let slides = slides();
    let images = images();
    let dir = staging_dir("ok");
    let source: Arc<dyn AudioSource> = Arc::new(MemoryAudioSource(tone(20)));
    let ctx = ExportContext::new(&slides, settings(1.0, 0.5), CANVAS, fps(10), &images)
        .with_audio(source, AudioMode::FadeOut)
        .with_start_slide(1);
    let mut sink = InMemorySink::new();
    let mut driver = ExportDriver::new(ExportOpts {
        yield_between_frames: false,
        audio_sample_rate: 8_000,
        staging_dir: Some(dir.clone()),
        ..ExportOpts::default()
    });

    let outcome = driver
        .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
        .unwrap();

    assert!(outcome.artifact.has_audio);
    assert!(outcome.warnings.is_empty());
    let leftovers = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
    assert_eq!(leftovers, 0);
    let _ = std::fs::remove_dir_all(dir);
}

struct NeverReady;

impl AudioSource for NeverReady {
    fn describe(&self) -> String {
        "never-ready".into()
    }

    fn open(&self) -> ReelResult<AudioTrack> {
        std::thread::sleep(std::time::Duration::from_secs(2));
        Err(ReelError::decode("gave up"))
    }
}

#[derive(Default)]
struct PreviewLog(Vec<&'static str>);

impl PreviewAudio for PreviewLog {
    fn suspend(&mut self) {
        self.0.push("suspend");
    }
    fn restore(&mut self) {
        self.0.push("restore");
    }
}

#[test]
fn slow_audio_degrades_to_silent_export() {
    let slides = slides();
    let images = images();
    let mut preview = PreviewLog::default();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.0), CANVAS, fps(10), &images)
        .with_audio(Arc::new(NeverReady), AudioMode::Loop)
        .with_preview_audio(&mut preview);
    let mut sink = InMemorySink::new();
    let mut driver = ExportDriver::new(ExportOpts {
        yield_between_frames: false,
        audio_ready_timeout: std::time::Duration::from_millis(20),
        ..ExportOpts::default()
    });

    let outcome = driver
        .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
        .unwrap();

    assert_eq!(outcome.frames, 30);
    assert!(!outcome.artifact.has_audio);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("never-ready"));
    assert!(outcome.warnings[0].contains("timeout"));
    assert_eq!(preview.0, vec!["suspend", "restore"]);
}

#[test]
fn preview_audio_is_restored_after_failure() {
    let slides = slides();
    let images = images();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut preview = PreviewLog::default();
    let ctx = ExportContext::new(&slides, settings(1.0, 0.0), CANVAS, fps(10), &images)
        .with_cancel(cancel)
        .with_preview_audio(&mut preview);
    let mut sink = InMemorySink::new();

    let err = quiet_driver()
        .run(ctx, &mut sink, &mut crate::export::progress::NoProgress)
        .unwrap_err();

    assert!(matches!(err, ReelError::Cancelled));
    assert_eq!(preview.0, vec!["suspend", "restore"]);
}

#[test]
fn out_of_range_start_slide_is_invalid() {
    let slides = slides();
    let images = images();
    let ctx = ExportContext::new(&slides, Settings::default(), CANVAS, fps(30), &images)
        .with_start_slide(3);
    let err = quiet_driver()
        .run(
            ctx,
            &mut InMemorySink::new(),
            &mut crate::export::progress::NoProgress,
        )
        .unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}
