//! Homebrew formula documents.
//!
//! A formula is free-form Ruby. ghbr only cares about three fields in it,
//! each a keyword followed by a quoted value:
//!
//! ```ruby
//! version 'v0.0.1'
//! url 'https://github.com/owner/app/releases/download/v0.0.1/app_darwin_amd64.zip'
//! sha256 '9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08'
//! ```
//!
//! [`FormulaDocument`] reads and rewrites those fields; [`FormulaGenerator`]
//! renders a new formula for a freshly created tap.

use crate::error::{Error, Result};
use crate::resolver::ReleaseInfo;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ghbr_github::FileContent;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version\s['"]([\w.-]+)['"]"#).expect("valid version regex"));

#[allow(clippy::expect_used)]
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\s['"]((http|https)://[\w./?%&=-]+)['"]"#).expect("valid url regex")
});

#[allow(clippy::expect_used)]
static SHA256_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"sha256\s['"]([0-9A-Fa-f]{64})['"]"#).expect("valid sha256 regex")
});

/// A field ghbr reads and rewrites in a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaField {
    /// `version "..."`
    Version,
    /// `url "..."`
    Url,
    /// `sha256 "..."`
    Sha256,
}

impl FormulaField {
    /// All fields, in the order a bump rewrites them.
    pub const ALL: [Self; 3] = [Self::Version, Self::Url, Self::Sha256];

    /// The Ruby keyword introducing the field.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Url => "url",
            Self::Sha256 => "sha256",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Version => &VERSION_RE,
            Self::Url => &URL_RE,
            Self::Sha256 => &SHA256_RE,
        }
    }
}

impl fmt::Display for FormulaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The text of a formula file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaDocument {
    content: String,
}

impl FormulaDocument {
    /// Wraps formula text.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Decodes a file fetched from GitHub.
    ///
    /// The contents API returns base64 wrapped across lines; any other
    /// encoding is rejected.
    pub fn decode(file: &FileContent) -> Result<Self> {
        if file.encoding != "base64" {
            return Err(ghbr_github::Error::decode(format!(
                "unexpected encoding of {}: {}",
                file.path, file.encoding
            ))
            .into());
        }

        let compact: String = file
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD.decode(compact).map_err(|e| {
            ghbr_github::Error::decode(format!("failed to decode {}: {e}", file.path))
        })?;
        let content = String::from_utf8(bytes).map_err(|e| {
            ghbr_github::Error::decode(format!("{} is not valid UTF-8: {e}", file.path))
        })?;

        Ok(Self { content })
    }

    /// The formula text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Consumes the document, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.content
    }

    /// Value of the first occurrence of `field`.
    pub fn field(&self, field: FormulaField) -> Result<&str> {
        field
            .pattern()
            .captures(&self.content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or(Error::Parse { field })
    }

    /// The `version` value.
    pub fn version(&self) -> Result<&str> {
        self.field(FormulaField::Version)
    }

    /// The `url` value.
    pub fn url(&self) -> Result<&str> {
        self.field(FormulaField::Url)
    }

    /// The `sha256` value.
    pub fn sha256(&self) -> Result<&str> {
        self.field(FormulaField::Sha256)
    }

    /// Returns a copy with the value of the first `field` replaced.
    ///
    /// Only the quoted value changes; the keyword, quotes and the rest of
    /// the text are kept byte for byte.
    pub fn replace_field(&self, field: FormulaField, value: &str) -> Result<Self> {
        let m = field
            .pattern()
            .captures(&self.content)
            .and_then(|caps| caps.get(1))
            .ok_or(Error::Parse { field })?;

        let mut content =
            String::with_capacity(self.content.len() - m.as_str().len() + value.len());
        content.push_str(&self.content[..m.start()]);
        content.push_str(value);
        content.push_str(&self.content[m.end()..]);

        Ok(Self { content })
    }

    /// Points the formula at `release`.
    ///
    /// Rewrites version, url and sha256 in turn; each fails on its own if
    /// its field is missing.
    pub fn bump(&self, release: &ReleaseInfo) -> Result<Self> {
        self.replace_field(FormulaField::Version, &release.version)?
            .replace_field(FormulaField::Url, &release.asset_url)?
            .replace_field(FormulaField::Sha256, &release.checksum_hex)
    }
}

impl fmt::Display for FormulaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Data for generating a Homebrew formula.
#[derive(Debug, Clone)]
pub struct FormulaData {
    /// Formula class name (e.g., "Ghbr")
    pub class_name: String,
    /// Homepage URL
    pub homepage: String,
    /// Version (release tag)
    pub version: String,
    /// Download URL
    pub url: String,
    /// SHA256 checksum
    pub sha256: String,
    /// Binary installed into `bin`
    pub binary: String,
    /// Text shown by `brew info` after installation
    pub caveats: String,
}

impl FormulaData {
    /// Builds formula data for `app` at `release`.
    #[must_use]
    pub fn new(
        app: &str,
        homepage: impl Into<String>,
        release: &ReleaseInfo,
        caveats: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name(app),
            homepage: homepage.into(),
            version: release.version.clone(),
            url: release.asset_url.clone(),
            sha256: release.checksum_hex.clone(),
            binary: app.to_string(),
            caveats: caveats.into(),
        }
    }
}

/// Converts an app name to a Ruby class name (`my-app` -> `MyApp`).
#[must_use]
pub fn class_name(app: &str) -> String {
    app.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}

/// Homebrew formula generator.
pub struct FormulaGenerator;

impl FormulaGenerator {
    /// Generates a Ruby formula from the data.
    #[must_use]
    pub fn generate(data: &FormulaData) -> String {
        format!(
            r"require 'formula'

class {class_name} < Formula
  homepage '{homepage}'
  version '{version}'

  url '{url}'
  sha256 '{sha256}'

  def install
    bin.install '{binary}'
  end

  def caveats
    <<-'EOF'
{caveats}
EOF
  end
end
",
            class_name = data.class_name,
            homepage = data.homepage,
            version = data.version,
            url = data.url,
            sha256 = data.sha256,
            binary = data.binary,
            caveats = data.caveats.trim_end_matches('\n'),
        )
    }
}
