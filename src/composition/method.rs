//! Composition methods and their user-facing descriptors.

use std::fmt;
use std::str::FromStr;

use crate::error::CompositionError;

/// Cross-fade family transitions understood by the `xfade` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Fade,
    SlideRight,
    SlideLeft,
    SlideDown,
    SlideUp,
    WipeLeft,
    WipeRight,
    Dissolve,
}

impl TransitionKind {
    /// Every transition kind, in help-listing order
    pub const ALL: [TransitionKind; 8] = [
        TransitionKind::Fade,
        TransitionKind::SlideRight,
        TransitionKind::SlideLeft,
        TransitionKind::SlideDown,
        TransitionKind::SlideUp,
        TransitionKind::WipeLeft,
        TransitionKind::WipeRight,
        TransitionKind::Dissolve,
    ];

    /// Name of the transition as the `xfade` filter spells it
    pub fn xfade_name(&self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideRight => "slideright",
            Self::SlideLeft => "slideleft",
            Self::SlideDown => "slidedown",
            Self::SlideUp => "slideup",
            Self::WipeLeft => "wipeleft",
            Self::WipeRight => "wiperight",
            Self::Dissolve => "dissolve",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xfade_name())
    }
}

/// How the clips are combined into one output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositionMethod {
    /// Demuxer concatenation with stream copy
    Simple,
    /// Pairwise cross-fade fold over every clip
    Transition(TransitionKind),
    /// Grid of scaled clips on a fixed canvas
    SideBySide,
    /// Clips scaled to one column and stacked top to bottom
    Stacked,
}

impl CompositionMethod {
    /// Every method, in help-listing order
    pub fn all() -> Vec<CompositionMethod> {
        let mut methods = vec![Self::Simple];
        methods.extend(TransitionKind::ALL.iter().copied().map(Self::Transition));
        methods.push(Self::SideBySide);
        methods.push(Self::Stacked);
        methods
    }

    /// Key used on the command line, without the leading `--`
    pub fn key(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Transition(kind) => kind.xfade_name(),
            Self::SideBySide => "sidebyside",
            Self::Stacked => "stacked",
        }
    }

    /// Short display name used in banners
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "Simple (Fastest)",
            Self::Transition(TransitionKind::Fade) => "Fade Transition",
            Self::Transition(TransitionKind::SlideRight) => "Slide Right",
            Self::Transition(TransitionKind::SlideLeft) => "Slide Left",
            Self::Transition(TransitionKind::SlideDown) => "Slide Down",
            Self::Transition(TransitionKind::SlideUp) => "Slide Up",
            Self::Transition(TransitionKind::WipeLeft) => "Wipe Left",
            Self::Transition(TransitionKind::WipeRight) => "Wipe Right",
            Self::Transition(TransitionKind::Dissolve) => "Dissolve",
            Self::SideBySide => "Side-by-Side",
            Self::Stacked => "Stacked",
        }
    }

    /// One-line description for the help listing
    pub fn description(&self) -> &'static str {
        match self {
            Self::Simple => "Direct concatenation, no re-encoding",
            Self::Transition(TransitionKind::Fade) => "Smooth fade between clips",
            Self::Transition(TransitionKind::SlideRight) => "New clip slides in from the left",
            Self::Transition(TransitionKind::SlideLeft) => "New clip slides in from the right",
            Self::Transition(TransitionKind::SlideDown) => "New clip slides down from the top",
            Self::Transition(TransitionKind::SlideUp) => "New clip slides up from the bottom",
            Self::Transition(TransitionKind::WipeLeft) => "Wipe effect, new clip reveals left",
            Self::Transition(TransitionKind::WipeRight) => "Wipe effect, new clip reveals right",
            Self::Transition(TransitionKind::Dissolve) => "Smooth dissolve between clips",
            Self::SideBySide => "Videos arranged in a grid",
            Self::Stacked => "Videos stacked vertically",
        }
    }

    /// Whether the method avoids re-encoding
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Simple)
    }

    /// Smallest number of clips the method can compose
    pub fn min_clips(&self) -> usize {
        match self {
            Self::Simple => 1,
            Self::Transition(_) | Self::SideBySide | Self::Stacked => 2,
        }
    }

    /// Comma-separated `--key` list of every method
    pub fn available_keys() -> String {
        Self::all()
            .iter()
            .map(|m| format!("--{}", m.key()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Help text block listing every method
    pub fn help_listing() -> String {
        let mut text = String::new();
        for method in Self::all() {
            text.push_str(&format!("  --{:<15} {}\n", method.key(), method.label()));
            text.push_str(&format!("     {}", method.description()));
            if method.is_fast() {
                text.push_str(" (fast, no re-encoding)");
            }
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for CompositionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.key())
    }
}

impl FromStr for CompositionMethod {
    type Err = CompositionError;

    /// Parse a method token; it must carry the leading `--`
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || CompositionError::UnknownMethod {
            method: token.to_string(),
            available: Self::available_keys(),
        };

        let key = token.strip_prefix("--").ok_or_else(unknown)?;
        Self::all()
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_method_key() {
        for method in CompositionMethod::all() {
            let token = format!("--{}", method.key());
            assert_eq!(token.parse::<CompositionMethod>().unwrap(), method);
        }
        assert_eq!(CompositionMethod::all().len(), 11);
    }

    #[test]
    fn test_transition_keys() {
        let method: CompositionMethod = "--wipeleft".parse().unwrap();
        assert_eq!(method, CompositionMethod::Transition(TransitionKind::WipeLeft));
        assert!(!method.is_fast());
        assert_eq!(method.min_clips(), 2);
    }

    #[test]
    fn test_unknown_method_lists_all_keys() {
        let err = "--bogus".parse::<CompositionMethod>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("--bogus"));
        for method in CompositionMethod::all() {
            assert!(text.contains(&format!("--{}", method.key())), "missing {}", method);
        }
    }

    #[test]
    fn test_method_requires_dashes() {
        assert!("fade".parse::<CompositionMethod>().is_err());
        assert!("video.mp4".parse::<CompositionMethod>().is_err());
    }

    #[test]
    fn test_only_simple_is_fast() {
        let fast: Vec<_> = CompositionMethod::all()
            .into_iter()
            .filter(|m| m.is_fast())
            .collect();
        assert_eq!(fast, vec![CompositionMethod::Simple]);
    }
}
