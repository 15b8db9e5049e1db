//! Reconciles requested clip and transition durations with probed clip lengths.

use crate::video::Clip;

/// Shortest clip duration auto-adjustment will ever pick (seconds)
pub const MIN_AUTO_DURATION: f64 = 2.0;

/// Clip content kept ahead of the transition (seconds)
pub const LEAD_IN: f64 = 1.0;

/// Shortest transition auto-adjustment will ever pick (seconds)
pub const MIN_TRANSITION: f64 = 0.5;

/// Effective durations used to build a transition composition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Seconds of each clip kept in the output
    pub clip_duration: f64,

    /// Seconds each cross-fade lasts
    pub transition_duration: f64,

    /// What auto-adjustment changed, if anything
    pub adjustment: Option<Adjustment>,
}

/// Record of an automatic duration change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    /// Shortest successfully probed clip duration
    pub shortest_clip: f64,

    /// Requested and adjusted clip duration
    pub clip_duration: Option<(f64, f64)>,

    /// Requested and adjusted transition duration
    pub transition_duration: Option<(f64, f64)>,
}

impl Timing {
    /// Timing taken verbatim from the request
    pub fn requested(clip_duration: f64, transition_duration: f64) -> Self {
        Self {
            clip_duration,
            transition_duration,
            adjustment: None,
        }
    }

    /// Timeline offset at which every cross-fade starts
    pub fn offset(&self) -> f64 {
        (self.clip_duration - self.transition_duration).max(0.0)
    }
}

/// Resolve the durations a transition composition will use
///
/// Nothing is adjusted when the caller set the clip duration explicitly or
/// when no clip duration could be probed.
pub fn resolve_timing(
    clips: &[Clip],
    requested_clip: f64,
    requested_transition: f64,
    user_set_duration: bool,
) -> Timing {
    let requested = Timing::requested(requested_clip, requested_transition);
    if user_set_duration {
        return requested;
    }

    let Some(shortest) = clips
        .iter()
        .filter_map(|clip| clip.duration)
        .reduce(f64::min)
    else {
        return requested;
    };

    let auto_duration = (shortest.floor() - LEAD_IN).max(MIN_AUTO_DURATION);
    let clip_duration = if auto_duration < requested_clip {
        auto_duration
    } else {
        requested_clip
    };

    let transition_duration = if requested_transition > clip_duration - LEAD_IN {
        (clip_duration - LEAD_IN).max(MIN_TRANSITION)
    } else {
        requested_transition
    };

    let changed = |from: f64, to: f64| (from != to).then_some((from, to));
    let clip_change = changed(requested_clip, clip_duration);
    let transition_change = changed(requested_transition, transition_duration);

    let adjustment = (clip_change.is_some() || transition_change.is_some()).then_some(Adjustment {
        shortest_clip: shortest,
        clip_duration: clip_change,
        transition_duration: transition_change,
    });

    Timing {
        clip_duration,
        transition_duration,
        adjustment,
    }
}
