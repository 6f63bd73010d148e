//! Application information taken from the package manifest at compile time.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Features listed in [`AppInfo::about_text`].
const FEATURES: [&str; 6] = [
    "Frame-accurate seeking by index or timestamp",
    "Frame-by-frame stepping and timed playback",
    "Export to JPEG, PNG, BMP, TIFF, and WebP",
    "Custom output resolution with aspect ratio preservation",
    "Resolution presets for common screens and social media",
    "Powered by FFmpeg",
];

/// Name, version, and authorship of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Authors, as listed in the manifest (colon separated there).
    pub authors: Vec<&'static str>,
    pub description: &'static str,
    pub repository: &'static str,
}

impl AppInfo {
    /// Read everything from `Cargo.toml`.
    pub fn from_manifest() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            authors: env!("CARGO_PKG_AUTHORS")
                .split(':')
                .map(str::trim)
                .filter(|author| !author.is_empty())
                .collect(),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
        }
    }

    /// Multi-line text for an "about" screen.
    pub fn about_text(&self) -> String {
        let mut text = format!("{self}\n\n{}\n\nFeatures:\n", self.description);
        for feature in FEATURES {
            text.push_str("  - ");
            text.push_str(feature);
            text.push('\n');
        }
        if !self.authors.is_empty() {
            text.push_str(&format!("\nAuthors: {}\n", self.authors.join(", ")));
        }
        if !self.repository.is_empty() {
            text.push_str(&format!("Source: {}\n", self.repository));
        }
        text
    }
}

impl Display for AppInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.name, self.version)
    }
}
