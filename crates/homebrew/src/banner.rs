//! FIGlet banner shown in a formula's caveats.

use crate::error::{Error, Result};
use figlet_rs::FIGfont;
use std::fmt;
use std::path::PathBuf;

/// Font used to render the caveats banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BannerFont {
    /// The built-in FIGlet "standard" font
    #[default]
    Standard,
    /// A `.flf` font file
    File(PathBuf),
}

impl BannerFont {
    /// Interprets a `--font` value: `standard`, or a path to a font file.
    #[must_use]
    pub fn from_arg(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("standard") {
            Self::Standard
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Renders `text` as ASCII art.
    pub fn render(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(Error::validation("missing text to render as a banner"));
        }

        let font = match self {
            Self::Standard => FIGfont::standard()
                .map_err(|e| Error::validation(format!("failed to load the standard font: {e}")))?,
            Self::File(path) => {
                let content = std::fs::read_to_string(path)?;
                FIGfont::from_content(&content).map_err(|e| {
                    Error::validation(format!("invalid font file {}: {e}", path.display()))
                })?
            }
        };

        let figure = font.convert(text).ok_or_else(|| {
            Error::validation(format!("could not render {text:?} with font {self}"))
        })?;

        Ok(figure.to_string())
    }
}

impl fmt::Display for BannerFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
