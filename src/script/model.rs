use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SubtitleSource;
use crate::foundation::error::{ReelError, ReelResult};

/// A scene-by-scene video script.
///
/// `total_duration` is informational; render timing always comes from narration audio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub total_duration: f64,
}

/// One narrated unit: an image, a narration clip, and subtitle text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Join key into the image and audio asset maps.
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub scene_number: u32,
    /// Spoken line.
    pub dialogue: String,
    /// Phonetic rendering of `dialogue` for speech synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue_for_tts: Option<String>,
    /// Prompt the scene image was generated from.
    pub image_prompt: String,
    /// Advisory duration in seconds.
    #[serde(deserialize_with = "float_or_numeric_string")]
    pub duration: f64,
    /// Short headline shown as a subtitle.
    pub subtitle: String,
}

impl Scene {
    /// Subtitle text for `source`.
    pub fn subtitle_text(&self, source: SubtitleSource) -> &str {
        match source {
            SubtitleSource::Headline => &self.subtitle,
            SubtitleSource::Dialogue => &self.dialogue,
        }
    }
}

impl Script {
    /// Parse a JSON document.
    pub fn parse_json(json: &str) -> ReelResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        tracing::debug!(title = %script.title, scenes = script.scenes.len(), "parsed script");
        Ok(script)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReelError::validation(format!("read script '{}': {e}", path.display()))
        })?;
        Self::parse_json(&text)
    }

    /// Check the structural rules every script must satisfy.
    ///
    /// Scene errors name the scene's 1-based position in the list.
    pub fn validate(&self) -> ReelResult<()> {
        if self.scenes.is_empty() {
            return Err(ReelError::validation("script has no scenes"));
        }
        let mut seen = BTreeSet::new();
        for (i, scene) in self.scenes.iter().enumerate() {
            let pos = i + 1;
            if scene.scene_number == 0 {
                return Err(ReelError::validation(format!(
                    "scene {pos}: scene_number must be positive"
                )));
            }
            if !seen.insert(scene.scene_number) {
                return Err(ReelError::validation(format!(
                    "scene {pos}: duplicate scene_number {}",
                    scene.scene_number
                )));
            }
            if scene.dialogue.is_empty() {
                return Err(ReelError::validation(format!("scene {pos}: dialogue is empty")));
            }
            if scene.image_prompt.is_empty() {
                return Err(ReelError::validation(format!(
                    "scene {pos}: image_prompt is empty"
                )));
            }
            if !scene.duration.is_finite() || scene.duration <= 0.0 {
                return Err(ReelError::validation(format!(
                    "scene {pos}: duration {} is invalid",
                    scene.duration
                )));
            }
        }
        Ok(())
    }

    /// Recompute `total_duration` as the sum of declared scene durations.
    pub fn normalize(&mut self) {
        self.total_duration = self.scenes.iter().map(|s| s.duration).sum();
    }

    /// Parse, validate and normalize in one step.
    pub fn load_validated(json: &str) -> ReelResult<Self> {
        let mut script = Self::parse_json(json)?;
        script.validate()?;
        script.normalize();
        Ok(script)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Int(u64),
    Float(f64),
    Str(String),
}

fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Int(n) => u32::try_from(n).map_err(D::Error::custom),
        NumOrStr::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
            Ok(f as u32)
        }
        NumOrStr::Float(f) => Err(D::Error::custom(format!("scene_number {f} is not an integer"))),
        NumOrStr::Str(s) => s.trim().parse::<u32>().map_err(D::Error::custom),
    }
}

fn float_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Int(n) => Ok(n as f64),
        NumOrStr::Float(f) => Ok(f),
        NumOrStr::Str(s) => s.trim().parse::<f64>().map_err(D::Error::custom),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
