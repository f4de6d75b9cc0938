// src/persona/mod.rs
// Persona definitions for the companion chat.
// Currently only 心语晴空 (Qingkong) is implemented; the enum leaves room
// for additional personas if the product grows alternate voices.

pub mod qingkong;

pub use qingkong::QINGKONG_PERSONA_PROMPT;

/// Static identity/style definitions injected as the base system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// 心语晴空 — warm, empathetic companion voice.
    Qingkong,
}

impl Persona {
    /// Base system instruction for this persona.
    pub fn prompt(&self) -> &'static str {
        match self {
            Persona::Qingkong => QINGKONG_PERSONA_PROMPT,
        }
    }

    /// Display name surfaced in API responses.
    pub fn name(&self) -> &'static str {
        match self {
            Persona::Qingkong => "心语晴空",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Persona::Qingkong => "qingkong",
            }
        )
    }
}

impl std::str::FromStr for Persona {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qingkong" => Ok(Persona::Qingkong),
            _ => Err(()),
        }
    }
}
