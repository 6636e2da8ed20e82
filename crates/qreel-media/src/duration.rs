//! Duration normalization.
//!
//! Decides how a source stream reaches an exact target length: trim a long
//! source, loop a short one a whole number of times and trim the result, or
//! pass an exact-length source through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MediaError, MediaResult};

/// What happens to the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationAction {
    /// Source is longer than the target: cut at the target
    Trim,
    /// Source is shorter: concatenate whole copies, then cut
    Loop,
    /// Source already has the target length
    PassThrough,
}

impl fmt::Display for DurationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationAction::Trim => write!(f, "trim"),
            DurationAction::Loop => write!(f, "loop"),
            DurationAction::PassThrough => write!(f, "pass_through"),
        }
    }
}

/// Scheduling decision for one source stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationPlan {
    pub action: DurationAction,
    /// Source length in seconds
    pub source_duration: f64,
    /// Number of whole copies of the source played back to back
    pub repetitions: u32,
    /// Cut point applied to the (possibly concatenated) stream
    pub trim_to: f64,
}

impl DurationPlan {
    /// Length of the stream once the plan is executed.
    pub fn planned_duration(&self) -> f64 {
        (self.source_duration * self.repetitions as f64).min(self.trim_to)
    }

    /// Value for FFmpeg's `-stream_loop` (extra plays after the first).
    pub fn stream_loop_count(&self) -> u32 {
        self.repetitions.saturating_sub(1)
    }
}

/// Plan how a `source_duration` stream reaches exactly `target_duration`.
///
/// # Panics
///
/// Panics if either duration is not a positive finite number. Use
/// [`try_fit`] for durations read from media files.
pub fn fit(source_duration: f64, target_duration: f64) -> DurationPlan {
    assert!(
        is_positive(source_duration) && is_positive(target_duration),
        "durations must be positive (source {source_duration}, target {target_duration})"
    );

    if source_duration > target_duration {
        DurationPlan {
            action: DurationAction::Trim,
            source_duration,
            repetitions: 1,
            trim_to: target_duration,
        }
    } else if source_duration < target_duration {
        // Float to int casts saturate, so only the increment can overflow
        let repetitions = ((target_duration / source_duration).floor() as u32).saturating_add(1);
        DurationPlan {
            action: DurationAction::Loop,
            source_duration,
            repetitions,
            trim_to: target_duration,
        }
    } else {
        DurationPlan {
            action: DurationAction::PassThrough,
            source_duration,
            repetitions: 1,
            trim_to: target_duration,
        }
    }
}

/// Like [`fit`], but reports unusable durations as errors.
///
/// A probed source with no measurable length cannot be looped, so it is
/// treated as undecodable.
pub fn try_fit(source_duration: f64, target_duration: f64) -> MediaResult<DurationPlan> {
    if !is_positive(target_duration) {
        return Err(MediaError::invalid_input(format!(
            "target duration must be positive, got {}",
            target_duration
        )));
    }
    if !is_positive(source_duration) {
        return Err(MediaError::decode_failed(format!(
            "source has no usable duration ({})",
            source_duration
        )));
    }
    Ok(fit(source_duration, target_duration))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
