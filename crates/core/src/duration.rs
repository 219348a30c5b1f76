//! ISO-8601 video durations and short-form classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{Result, TubemarkError},
    types::Orientation,
};

/// Videos strictly shorter than this are short-form candidates.
pub const SHORT_FORM_MAX_SECONDS: u64 = 60;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is valid")
});

/// Parse `P[nD]T[nH][nM][nS]` into whole seconds.
///
/// `P0D` is what the API reports for live and upcoming streams.
pub fn parse_iso8601_duration(value: &str) -> Result<u64> {
    let invalid = || TubemarkError::InvalidDuration {
        value: value.to_string(),
    };

    // "P" and "PT" match the pattern with every component absent.
    if value.ends_with('P') || value.ends_with('T') {
        return Err(invalid());
    }
    let caps = DURATION_PATTERN.captures(value).ok_or_else(invalid)?;

    let component = |index: usize| -> Result<u64> {
        caps.get(index)
            .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
            .unwrap_or(Ok(0))
    };

    [(1, 86_400), (2, 3_600), (3, 60), (4, 1)]
        .into_iter()
        .try_fold(0u64, |total, (index, unit)| {
            component(index)?
                .checked_mul(unit)
                .and_then(|seconds| total.checked_add(seconds))
                .ok_or_else(invalid)
        })
}

/// How a candidate is judged to be a short-form clip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortsRule {
    /// Shorter than a minute.
    #[default]
    MinDuration,
    /// Any minutes or seconds component present. Over-classifies anything
    /// under an hour that isn't a whole number of hours; kept for comparison.
    ComponentPresence,
    /// Shorter than a minute and taller than wide.
    VerticalMinDuration,
    /// Keep everything.
    None,
}

impl ShortsRule {
    pub fn needs_details(&self) -> bool {
        !matches!(self, ShortsRule::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShortsRule::MinDuration => "min-duration",
            ShortsRule::ComponentPresence => "component-presence",
            ShortsRule::VerticalMinDuration => "vertical-min-duration",
            ShortsRule::None => "none",
        }
    }

    pub fn is_short(&self, duration: &str, orientation: Option<Orientation>) -> Result<bool> {
        match self {
            ShortsRule::MinDuration => {
                Ok(parse_iso8601_duration(duration)? < SHORT_FORM_MAX_SECONDS)
            }
            ShortsRule::ComponentPresence => {
                let time = duration.split_once('T').map(|(_, t)| t).unwrap_or("");
                Ok(time.contains('M') || time.contains('S'))
            }
            ShortsRule::VerticalMinDuration => {
                let seconds = parse_iso8601_duration(duration)?;
                Ok(seconds < SHORT_FORM_MAX_SECONDS && orientation == Some(Orientation::Vertical))
            }
            ShortsRule::None => Ok(false),
        }
    }
}
