use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chatbot personality sent along with every chat request.
///
/// Only the tag matters to the client; the server decides what each one
/// sounds like.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Neutral,
    Ronaldo,
    Messi,
    #[value(name = "manutd")]
    #[serde(rename = "manutd")]
    ManUtd,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Neutral,
        Persona::Ronaldo,
        Persona::Messi,
        Persona::ManUtd,
    ];

    /// Wire tag, as the server expects it in `personality`.
    pub fn tag(self) -> &'static str {
        match self {
            Persona::Neutral => "neutral",
            Persona::Ronaldo => "ronaldo",
            Persona::Messi => "messi",
            Persona::ManUtd => "manutd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Neutral => "⚽ Neutral",
            Persona::Ronaldo => "🐐 Ronaldo fan",
            Persona::Messi => "✨ Messi fan",
            Persona::ManUtd => "👹 Man Utd fan",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown persona '{0}' (expected one of: neutral, ronaldo, messi, manutd)")]
pub struct UnknownPersona(pub String);

impl FromStr for Persona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Persona::ALL
            .into_iter()
            .find(|persona| persona.tag().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPersona(wanted.to_string()))
    }
}
