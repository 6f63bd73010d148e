//! Common output resolutions.
//!
//! A fixed table of resolutions users typically export to, grouped into
//! landscape, portrait, and social-media categories. Presets are plain
//! [`Size`] values; combine them with
//! [`OutputSize::fit`](crate::OutputSize::fit) to keep the source proportion.

use std::fmt::{Display, Formatter, Result as FmtResult};

use PresetCategory::{Landscape, Portrait, SocialMedia};

use crate::resize::Size;

/// The group a [`ResolutionPreset`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCategory {
    /// Wider than tall.
    Landscape,
    /// Taller than wide.
    Portrait,
    /// Sizes used by social media platforms.
    SocialMedia,
}

impl PresetCategory {
    /// All categories in display order.
    pub const ALL: [PresetCategory; 3] = [
        PresetCategory::Landscape,
        PresetCategory::Portrait,
        PresetCategory::SocialMedia,
    ];
}

impl Display for PresetCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PresetCategory::Landscape => "Landscape",
            PresetCategory::Portrait => "Portrait",
            PresetCategory::SocialMedia => "Social media",
        };
        f.write_str(name)
    }
}

/// A named output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPreset {
    /// Short identifier accepted on the command line (e.g. `"fhd"`).
    pub name: &'static str,
    /// Description shown in listings.
    pub label: &'static str,
    /// Category used for grouping.
    pub category: PresetCategory,
    /// The resolution itself.
    pub size: Size,
}

const fn preset(
    name: &'static str,
    label: &'static str,
    category: PresetCategory,
    width: u32,
    height: u32,
) -> ResolutionPreset {
    ResolutionPreset {
        name,
        label,
        category,
        size: Size::new(width, height),
    }
}

/// Every known preset, grouped by category.
pub const PRESETS: &[ResolutionPreset] = &[
    preset("fhd", "Full HD", Landscape, 1920, 1080),
    preset("hd", "HD", Landscape, 1280, 720),
    preset("wxga", "WXGA", Landscape, 1366, 768),
    preset("xga", "XGA", Landscape, 1024, 768),
    preset("svga", "SVGA", Landscape, 800, 600),
    preset("vga", "VGA", Landscape, 640, 480),
    preset("uhd", "4K UHD", Landscape, 3840, 2160),
    preset("qhd", "QHD", Landscape, 2560, 1440),
    preset("fhd-portrait", "Full HD", Portrait, 1080, 1920),
    preset("hd-portrait", "HD", Portrait, 720, 1280),
    preset("wxga-portrait", "WXGA", Portrait, 768, 1366),
    preset("xga-portrait", "XGA", Portrait, 768, 1024),
    preset("svga-portrait", "SVGA", Portrait, 600, 800),
    preset("vga-portrait", "VGA", Portrait, 480, 640),
    preset("uhd-portrait", "4K UHD", Portrait, 2160, 3840),
    preset("qhd-portrait", "QHD", Portrait, 1440, 2560),
    preset("instagram-square", "Instagram square", SocialMedia, 1080, 1080),
    preset("instagram-portrait", "Instagram portrait", SocialMedia, 1080, 1350),
    preset("facebook-landscape", "Facebook landscape", SocialMedia, 1200, 630),
    preset("facebook-square", "Facebook square", SocialMedia, 1200, 1200),
    preset("tiktok", "TikTok", SocialMedia, 1080, 1920),
    preset("youtube-thumbnail", "YouTube thumbnail", SocialMedia, 1280, 720),
    preset("twitter-header", "Twitter header", SocialMedia, 1500, 500),
];

/// Presets belonging to `category`, in table order.
pub fn presets_in(category: PresetCategory) -> impl Iterator<Item = &'static ResolutionPreset> {
    PRESETS.iter().filter(move |preset| preset.category == category)
}

/// Look up a preset by its short name, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<&'static ResolutionPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}
