use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::audio::envelope::AudioMode;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::slideshow::model::{Settings, Slide, Timeline};

/// Background track attached to a show.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioSpec {
    /// Audio file, relative to the project's assets root.
    pub source: String,
    #[serde(default)]
    pub mode: AudioMode,
}

/// On-disk description of a slideshow export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideshowProject {
    pub canvas: Canvas,
    #[serde(default)]
    pub fps: Fps,
    #[serde(default)]
    pub settings: Settings,
    pub slides: Vec<Slide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioSpec>,
    /// Slide the preview player was on when export started; seeds the audio start offset.
    #[serde(default)]
    pub start_slide: usize,
}

impl SlideshowProject {
    /// Read a project JSON file.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read project '{}'", path.display()))?;
        let project: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse project JSON '{}'", path.display()))?;
        Ok(project)
    }

    pub fn validate(&self) -> ReelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        self.canvas.validate()?;
        self.settings.validate()?;
        if self.slides.is_empty() {
            return Err(ReelError::invalid_input(
                "a slideshow needs at least one slide",
            ));
        }

        let mut seen = BTreeSet::new();
        for slide in &self.slides {
            if !seen.insert(slide.id.as_str()) {
                return Err(ReelError::invalid_input(format!(
                    "duplicate slide id '{}'",
                    slide.id
                )));
            }
            normalize_rel_path(&slide.source).map_err(|e| {
                ReelError::invalid_input(format!("slide '{}': {e}", slide.id))
            })?;
        }

        if let Some(audio) = &self.audio {
            normalize_rel_path(&audio.source)?;
        }
        if self.start_slide >= self.slides.len() {
            return Err(ReelError::invalid_input(format!(
                "start_slide {} is out of range for {} slides",
                self.start_slide,
                self.slides.len()
            )));
        }
        Ok(())
    }

    pub fn timeline(&self) -> ReelResult<Timeline> {
        Timeline::new(&self.settings, self.slides.len())
    }
}

/// Normalize an asset reference to a forward-slash relative path.
///
/// Absolute paths and `..` components are rejected so a project cannot reach outside its root.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') || s.contains(':') {
        return Err(ReelError::invalid_input("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::invalid_input("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::invalid_input(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::invalid_input(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Resolve an asset reference against `root`.
pub fn resolve_asset_path(root: &Path, source: &str) -> ReelResult<PathBuf> {
    let norm = normalize_rel_path(source)?;
    Ok(root.join(Path::new(&norm)))
}

#[cfg(test)]
#[path = "../../tests/unit/slideshow/project.rs"]
mod tests;
