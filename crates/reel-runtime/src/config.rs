#![forbid(unsafe_code)]

//! Viewer configuration as data.
//!
//! Captures every tunable of the viewer (clip pool, feed policy, gesture
//! thresholds, playback output) as a single [`ViewerConfig`] that can be
//! loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # reelfeed.toml
//! pool = ["/videos/1.mp4", "/videos/2.mp4", "/videos/3.mp4"]
//! seed = 7
//!
//! [feed]
//! batch_size = 10
//!
//! [gesture]
//! cooldown_ms = 250
//! ```
//!
//! ```rust,ignore
//! let config = ViewerConfig::from_toml_file("reelfeed.toml")?;
//! let viewer = config.build_viewer(surface)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the values the components use on their own, so
//! `ViewerConfig::default()` behaves exactly like the hardcoded viewer.

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use reel_core::{
    ClipPool, ClipSampler, DEFAULT_INITIAL_LEN, FeedPolicy, FeedSession, GestureConfig,
    PoolError, RandomSampler,
};

use crate::controller::PlaybackSettings;
use crate::surface::RenderSurface;
use crate::viewer::FeedViewer;

/// Clips used when no pool is configured.
pub const DEFAULT_POOL: [&str; 3] = ["/videos/1.mp4", "/videos/2.mp4", "/videos/3.mp4"];

// ---------------------------------------------------------------------------
// Top-level ViewerConfig
// ---------------------------------------------------------------------------

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ViewerConfig {
    /// Clip identifiers to sample from. Must be non-empty.
    pub pool: Vec<String>,
    /// Length of the opening feed. Default: 3.
    pub initial_len: usize,
    /// Sampler seed; `None` seeds from the OS. Default: None.
    pub seed: Option<u64>,
    /// Feed growth/trim thresholds.
    pub feed: FeedPolicyConfig,
    /// Gesture thresholds.
    pub gesture: GesturePolicyConfig,
    /// Playback output.
    pub playback: PlaybackPolicyConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pool: DEFAULT_POOL.iter().map(|s| (*s).to_string()).collect(),
            initial_len: DEFAULT_INITIAL_LEN,
            seed: None,
            feed: FeedPolicyConfig::default(),
            gesture: GesturePolicyConfig::default(),
            playback: PlaybackPolicyConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by file extension: `.json` as JSON, anything else as TOML.
    #[cfg(feature = "config-file")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.pool.is_empty() {
            errors.push("pool must contain at least one clip".into());
        }
        if self.pool.iter().any(|c| c.trim().is_empty()) {
            errors.push("pool entries must not be blank".into());
        }
        if self.initial_len == 0 {
            errors.push("initial_len must be > 0".into());
        }
        errors.extend(self.feed.to_policy().validate());
        errors.extend(self.gesture.to_gesture_config().validate());
        let volume = self.playback.volume;
        if !(volume > 0.0 && volume <= 1.0) {
            errors.push(format!("playback.volume must be in (0, 1], got {volume}"));
        }

        errors
    }

    /// Validate and assemble the clip pool.
    pub fn clip_pool(&self) -> Result<ClipPool, ConfigError> {
        ClipPool::new(self.pool.iter().map(String::as_str)).map_err(ConfigError::Pool)
    }

    /// Sampler described by `seed`.
    #[must_use]
    pub fn sampler(&self) -> Box<dyn ClipSampler> {
        match self.seed {
            Some(seed) => Box::new(RandomSampler::seeded(seed)),
            None => Box::new(RandomSampler::from_os_rng()),
        }
    }

    /// Validate and build a fresh feed session.
    pub fn build_session(&self) -> Result<FeedSession, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(FeedSession::with_parts(
            self.clip_pool()?,
            self.initial_len,
            self.feed.to_policy(),
            self.sampler(),
        ))
    }

    /// Validate and build a viewer around `surface`.
    pub fn build_viewer<S: RenderSurface>(&self, surface: S) -> Result<FeedViewer<S>, ConfigError> {
        let session = self.build_session()?;
        Ok(FeedViewer::new(
            surface,
            session,
            self.gesture.to_gesture_config(),
            self.playback.to_settings(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Feed growth/trim parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct FeedPolicyConfig {
    /// Grow when within this many clips of the tail. Default: 3.
    pub lookahead: usize,
    /// Clips appended per growth step. Default: 10.
    pub batch_size: usize,
    /// Trim only above this length. Default: 80.
    pub trim_len_threshold: usize,
    /// Trim only past this cursor index. Default: 40.
    pub trim_cursor_threshold: usize,
    /// Clips dropped per trim. Default: 30.
    pub trim_count: usize,
}

impl Default for FeedPolicyConfig {
    fn default() -> Self {
        let p = FeedPolicy::default();
        Self {
            lookahead: p.lookahead,
            batch_size: p.batch_size,
            trim_len_threshold: p.trim_len_threshold,
            trim_cursor_threshold: p.trim_cursor_threshold,
            trim_count: p.trim_count,
        }
    }
}

impl FeedPolicyConfig {
    #[must_use]
    pub fn to_policy(&self) -> FeedPolicy {
        FeedPolicy {
            lookahead: self.lookahead,
            batch_size: self.batch_size,
            trim_len_threshold: self.trim_len_threshold,
            trim_cursor_threshold: self.trim_cursor_threshold,
            trim_count: self.trim_count,
        }
    }
}

/// Gesture thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct GesturePolicyConfig {
    /// Minimum swipe distance. Default: 60.0.
    pub swipe_threshold: f32,
    /// Minimum wheel delta. Default: 20.0.
    pub wheel_threshold: f32,
    /// Lock cooldown in milliseconds. Default: 250.
    pub cooldown_ms: u64,
}

impl Default for GesturePolicyConfig {
    fn default() -> Self {
        let g = GestureConfig::default();
        Self {
            swipe_threshold: g.swipe_threshold,
            wheel_threshold: g.wheel_threshold,
            cooldown_ms: g.cooldown.as_millis() as u64,
        }
    }
}

impl GesturePolicyConfig {
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            swipe_threshold: self.swipe_threshold,
            wheel_threshold: self.wheel_threshold,
            cooldown: Duration::from_millis(self.cooldown_ms),
        }
    }
}

/// Playback output parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct PlaybackPolicyConfig {
    /// Output volume. Default: 1.0.
    pub volume: f32,
    /// Loop clips indefinitely. Default: true.
    pub looping: bool,
}

impl Default for PlaybackPolicyConfig {
    fn default() -> Self {
        let s = PlaybackSettings::default();
        Self {
            volume: s.volume,
            looping: s.looping,
        }
    }
}

impl PlaybackPolicyConfig {
    #[must_use]
    pub fn to_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            volume: self.volume,
            looping: self.looping,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or applying a viewer configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// The clip pool could not be built.
    Pool(PoolError),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Pool(e) => write!(f, "clip pool error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::RecordingSurface;

    #[test]
    fn defaults_match_components() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.feed.to_policy(), FeedPolicy::default());
        assert_eq!(cfg.gesture.to_gesture_config(), GestureConfig::default());
        assert_eq!(cfg.playback.to_settings(), PlaybackSettings::default());
        assert_eq!(cfg.initial_len, 3);
        assert_eq!(cfg.pool.len(), 3);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_empty());
    }

    #[test]
    fn empty_pool_fails_validation() {
        let cfg = ViewerConfig {
            pool: Vec::new(),
            ..ViewerConfig::default()
        };
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.contains("pool")));
        assert!(matches!(cfg.build_session(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_volume_and_initial_len_reported_together() {
        let cfg = ViewerConfig {
            initial_len: 0,
            playback: PlaybackPolicyConfig {
                volume: 1.5,
                looping: true,
            },
            ..ViewerConfig::default()
        };
        assert_eq!(cfg.validate().len(), 2);
    }

    #[test]
    fn silent_volume_rejected() {
        let cfg = ViewerConfig {
            playback: PlaybackPolicyConfig {
                volume: 0.0,
                looping: true,
            },
            ..ViewerConfig::default()
        };
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("playback.volume"));
    }

    #[test]
    fn seeded_sessions_match() {
        let cfg = ViewerConfig {
            seed: Some(11),
            ..ViewerConfig::default()
        };
        let mut a = cfg.build_session().unwrap();
        let mut b = cfg.build_session().unwrap();
        a.advance();
        b.advance();
        assert_eq!(a.buffer(), b.buffer());
        assert_eq!(a.len(), 13);
    }

    #[test]
    fn build_viewer_binds_first_pool_clip() {
        let viewer = ViewerConfig::default()
            .build_viewer(RecordingSurface::default())
            .unwrap();
        let bound = viewer.controller().surface().bound.clone().unwrap();
        assert_eq!(bound.as_str(), "/videos/1.mp4");
        assert_eq!(viewer.overlay().indicator(), "1 / 3");
    }

    #[test]
    fn validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
