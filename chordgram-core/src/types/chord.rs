use crate::error::{ChordgramError, LabelProblem, Result};
#[cfg(feature = "colored")]
use colored::*;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Accepted root spellings in ascending semitone order, starting from A.
/// Spellings in the same row are enharmonic; the first one is canonical.
const PITCH_SPELLINGS: [&[&str]; 12] = [
    &["A"],
    &["A#", "Bb"],
    &["B", "Cb"],
    &["C"],
    &["C#", "Db"],
    &["D"],
    &["D#", "Eb"],
    &["E", "Fb"],
    &["F"],
    &["F#", "Gb"],
    &["G"],
    &["G#", "Ab"],
];

const NO_CHORD: &str = "N";
const UNKNOWN_CHORD: &str = "X";

/// One color per pitch class, same indexing as `PITCH_SPELLINGS`
const PALETTE: [Rgb; 12] = [
    Rgb::new(230, 25, 75),   // A
    Rgb::new(245, 130, 48),  // A#
    Rgb::new(255, 225, 25),  // B
    Rgb::new(210, 245, 60),  // C
    Rgb::new(60, 180, 75),   // C#
    Rgb::new(70, 240, 240),  // D
    Rgb::new(0, 130, 200),   // D#
    Rgb::new(145, 30, 180),  // E
    Rgb::new(240, 50, 230),  // F
    Rgb::new(250, 190, 212), // F#
    Rgb::new(170, 110, 40),  // G
    Rgb::new(128, 0, 0),     // G#
];

const UNKNOWN_COLOR: Rgb = Rgb::new(128, 128, 128);

/// Root of a chord label: a pitch class (0-11, A = 0) or one of the
/// "no harmonic content" sentinels.
///
/// Variant order gives the display ordering: pitched roots first, then `N`, then `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Root {
    Pitch(u8),
    /// `N`: silence, no chord
    NoChord,
    /// `X`: harmonic content that could not be labelled
    Unknown,
}

impl Root {
    fn from_token(token: &str) -> Option<Root> {
        match token {
            NO_CHORD => return Some(Root::NoChord),
            UNKNOWN_CHORD => return Some(Root::Unknown),
            _ => {}
        }

        PITCH_SPELLINGS
            .iter()
            .position(|spellings| spellings.contains(&token))
            .map(|index| Root::Pitch(index as u8))
    }

    /// Canonical spelling of this root
    pub fn name(&self) -> &'static str {
        match self {
            Root::Pitch(pc) => PITCH_SPELLINGS[*pc as usize % 12][0],
            Root::NoChord => NO_CHORD,
            Root::Unknown => UNKNOWN_CHORD,
        }
    }
}

/// A canonical harmonic token parsed from a label such as `Bb:maj7` or `N`.
///
/// Equality is equality of the canonical string form: enharmonic roots collapse
/// onto one spelling at parse time and sentinels carry no quality, so the
/// derived comparison matches comparing `to_string()` outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    root: Root,
    quality: Option<String>, // always Some for pitched roots, None for sentinels
}

impl Chord {
    /// Parse a `root` or `root:quality` label
    pub fn parse(label: &str) -> Result<Self> {
        let (root_token, quality) = match label.split_once(':') {
            Some((_, rest)) if rest.contains(':') => {
                return Err(ChordgramError::invalid_label(
                    label,
                    LabelProblem::TooManySeparators,
                ));
            }
            Some((root, quality)) => (root, Some(quality)),
            None => (label, None),
        };

        let root = Root::from_token(root_token)
            .ok_or_else(|| ChordgramError::invalid_label(label, LabelProblem::UnknownRoot))?;

        match root {
            // `C:` keeps an empty quality and prints back as `C:`
            Root::Pitch(_) => match quality {
                Some(quality) => Ok(Chord {
                    root,
                    quality: Some(quality.to_string()),
                }),
                None => Err(ChordgramError::invalid_label(
                    label,
                    LabelProblem::MissingQuality,
                )),
            },
            // Whatever follows a sentinel root is dropped
            Root::NoChord | Root::Unknown => Ok(Chord {
                root,
                quality: None,
            }),
        }
    }

    /// The "no chord" sentinel (`N`)
    pub fn no_chord() -> Self {
        Chord {
            root: Root::NoChord,
            quality: None,
        }
    }

    pub fn root(&self) -> Root {
        self.root
    }

    /// Pitch class (0-11, A = 0), `None` for sentinels
    pub fn pitch_class(&self) -> Option<u8> {
        match self.root {
            Root::Pitch(pc) => Some(pc),
            _ => None,
        }
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self.root, Root::Pitch(_))
    }

    /// Return a copy shifted by `semitones` (negative shifts go down).
    /// Sentinels come back unchanged.
    pub fn transposed(&self, semitones: i32) -> Chord {
        let root = match self.root {
            Root::Pitch(pc) => Root::Pitch((pc as i32 + semitones).rem_euclid(12) as u8),
            sentinel => sentinel,
        };

        Chord {
            root,
            quality: self.quality.clone(),
        }
    }

    /// Palette color for this chord's root; sentinels get the "unknown" grey
    pub fn to_color(&self) -> Rgb {
        match self.root {
            Root::Pitch(pc) => PALETTE.get(pc as usize).copied().unwrap_or(UNKNOWN_COLOR),
            _ => UNKNOWN_COLOR,
        }
    }

    /// Canonical form painted with the chord's palette color, for terminals
    #[cfg(feature = "colored")]
    pub fn paint(&self) -> ColoredString {
        if self.is_sentinel() {
            return self.to_string().bright_black();
        }
        let Rgb { r, g, b } = self.to_color();
        self.to_string().truecolor(r, g, b).bold()
    }
}

impl FromStr for Chord {
    type Err = ChordgramError;

    fn from_str(s: &str) -> Result<Self> {
        Chord::parse(s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quality {
            Some(quality) if !self.is_sentinel() => write!(f, "{}:{}", self.root.name(), quality),
            _ => write!(f, "{}", self.root.name()),
        }
    }
}

impl Add<i32> for Chord {
    type Output = Chord;

    fn add(self, semitones: i32) -> Self::Output {
        self.transposed(semitones)
    }
}

impl Sub<i32> for Chord {
    type Output = Chord;

    fn sub(self, semitones: i32) -> Self::Output {
        self.transposed(-semitones)
    }
}

/// 8-bit RGB color, rendered as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
