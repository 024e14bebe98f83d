//! Difficulty grades derived from `smoothness` and `surface` tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty of a way, ordered from easiest to hardest.
///
/// `Unknown` sorts last and is used whenever the tags do not say enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Green,
    Blue,
    Red,
    Black,
    Unknown,
}

impl Grade {
    /// Every grade in difficulty order
    pub const ALL: [Grade; 5] = [
        Grade::Green,
        Grade::Blue,
        Grade::Red,
        Grade::Black,
        Grade::Unknown,
    ];

    /// Grade for a recognized `smoothness` value
    pub fn from_smoothness(smoothness: &str) -> Option<Self> {
        match smoothness {
            "excellent" => Some(Self::Green),
            "good" => Some(Self::Blue),
            "intermediate" => Some(Self::Red),
            "bad" => Some(Self::Black),
            _ => None,
        }
    }

    /// Grade for a recognized `surface` value
    ///
    /// `paved` is recognized but says nothing about difficulty, so it maps to
    /// `Unknown` and stops the lookup.
    pub fn from_surface(surface: &str) -> Option<Self> {
        match surface {
            "asphalt" => Some(Self::Green),
            "concrete" | "granite" => Some(Self::Blue),
            "paving_stones" | "tartan" | "wood" => Some(Self::Red),
            "cobblestone" | "compacted" | "fine_gravel" | "gravel" | "ground" | "sett"
            | "unpaved" => Some(Self::Black),
            "paved" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Whether the layer for this grade is shown before the user touches it
    pub fn visible_by_default(self) -> bool {
        !matches!(self, Self::Black | Self::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Black => "black",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable difficulty label
    pub fn label(self) -> &'static str {
        match self {
            Self::Green => "easy",
            Self::Blue => "moderate",
            Self::Red => "hard",
            Self::Black => "very hard",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a way by its tags.
///
/// A recognized smoothness always wins over the surface; anything
/// unrecognized falls through to the next source and finally to
/// [`Grade::Unknown`].
pub fn classify(smoothness: Option<&str>, surface: Option<&str>) -> Grade {
    smoothness
        .and_then(Grade::from_smoothness)
        .or_else(|| surface.and_then(Grade::from_surface))
        .unwrap_or(Grade::Unknown)
}
