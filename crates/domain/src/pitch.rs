use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Frequency used when a note name cannot be resolved.
pub const FALLBACK_FREQUENCY_HZ: f32 = 440.0;

/// One of the twelve chromatic pitches of the reference octave (A4 = 440 Hz).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pitch {
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

impl Pitch {
    pub const ALL: [Pitch; 12] = [
        Pitch::C,
        Pitch::CSharp,
        Pitch::D,
        Pitch::DSharp,
        Pitch::E,
        Pitch::F,
        Pitch::FSharp,
        Pitch::G,
        Pitch::GSharp,
        Pitch::A,
        Pitch::ASharp,
        Pitch::B,
    ];

    /// Equal-tempered frequency in Hz.
    pub fn frequency(self) -> f32 {
        match self {
            Pitch::C => 261.63,
            Pitch::CSharp => 277.18,
            Pitch::D => 293.66,
            Pitch::DSharp => 311.13,
            Pitch::E => 329.63,
            Pitch::F => 349.23,
            Pitch::FSharp => 369.99,
            Pitch::G => 392.00,
            Pitch::GSharp => 415.30,
            Pitch::A => 440.00,
            Pitch::ASharp => 466.16,
            Pitch::B => 493.88,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pitch::C => "C",
            Pitch::CSharp => "C#",
            Pitch::D => "D",
            Pitch::DSharp => "D#",
            Pitch::E => "E",
            Pitch::F => "F",
            Pitch::FSharp => "F#",
            Pitch::G => "G",
            Pitch::GSharp => "G#",
            Pitch::A => "A",
            Pitch::ASharp => "A#",
            Pitch::B => "B",
        }
    }

    pub fn solfege(self) -> &'static str {
        match self {
            Pitch::C => "Do",
            Pitch::CSharp => "Do#",
            Pitch::D => "Re",
            Pitch::DSharp => "Re#",
            Pitch::E => "Mi",
            Pitch::F => "Fa",
            Pitch::FSharp => "Fa#",
            Pitch::G => "Sol",
            Pitch::GSharp => "Sol#",
            Pitch::A => "La",
            Pitch::ASharp => "La#",
            Pitch::B => "Si",
        }
    }

    pub fn key_color(self) -> KeyColor {
        if self.name().ends_with('#') {
            KeyColor::Black
        } else {
            KeyColor::White
        }
    }

    pub fn is_sharp(self) -> bool {
        self.key_color() == KeyColor::Black
    }

    /// White keys of the octave, left to right.
    pub fn white_keys() -> impl Iterator<Item = Pitch> {
        Self::ALL.into_iter().filter(|pitch| !pitch.is_sharp())
    }

    fn natural(base: &str) -> Option<Pitch> {
        let pitch = match base {
            "c" | "do" | "до" => Pitch::C,
            "d" | "re" | "ре" => Pitch::D,
            "e" | "mi" | "ми" => Pitch::E,
            "f" | "fa" | "фа" => Pitch::F,
            "g" | "sol" | "соль" => Pitch::G,
            "a" | "la" | "ля" => Pitch::A,
            "b" | "si" | "си" => Pitch::B,
            _ => return None,
        };
        Some(pitch)
    }

    fn sharpened(self) -> Option<Pitch> {
        match self {
            Pitch::C => Some(Pitch::CSharp),
            Pitch::D => Some(Pitch::DSharp),
            Pitch::F => Some(Pitch::FSharp),
            Pitch::G => Some(Pitch::GSharp),
            Pitch::A => Some(Pitch::ASharp),
            _ => None,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pitch {
    type Err = DomainError;

    /// Accepts letter names (`C`, `c#`) and solfège names (`Do`, `sol#`, `Соль`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (base, sharp) = match lowered.strip_suffix('#') {
            Some(base) => (base, true),
            None => (lowered.as_str(), false),
        };
        let natural = Pitch::natural(base).ok_or_else(|| DomainError::UnknownPitch(s.to_string()))?;
        if sharp {
            natural
                .sharpened()
                .ok_or_else(|| DomainError::UnknownPitch(s.to_string()))
        } else {
            Ok(natural)
        }
    }
}

/// Lenient lookup used by tone synthesis: unknown names sound at 440 Hz.
pub fn frequency_for_name(name: &str) -> f32 {
    name.parse::<Pitch>()
        .map(Pitch::frequency)
        .unwrap_or(FALLBACK_FREQUENCY_HZ)
}
