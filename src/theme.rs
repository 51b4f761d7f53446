//! Visual Theme Identifiers
//!
//! The stage page carries its active theme as a body class; here themes are a
//! plain enum handed to the display collaborator. Each theme pins the color
//! used by the rain layers so the renderer never has to guess.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual theme of the stage page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Classic green rain
    Matrix,
    /// Red corrupted-signal look
    Glitch,
    /// White washed-out look
    Ghost,
    /// Electric blue, unlocked by the secret sequence
    Neon,
    /// Main-act theme paired with the main track
    Phantom,
}

impl Theme {
    /// Hex color used by the rain layers under this theme.
    pub fn rain_color(&self) -> &'static str {
        match self {
            Theme::Glitch => "#ff0033",
            Theme::Ghost => "#ffffff",
            Theme::Neon => "#7df9ff",
            // Matrix and Phantom share the classic green
            Theme::Matrix | Theme::Phantom => "#00ff00",
        }
    }

    /// Human-readable label shown in the HUD ("Neon", "Ghost", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Matrix => "Matrix",
            Theme::Glitch => "Glitch",
            Theme::Ghost => "Ghost",
            Theme::Neon => "Neon",
            Theme::Phantom => "Phantom",
        }
    }

}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
