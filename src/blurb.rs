//! The blurb tile model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BoardError;
use crate::id::BlurbId;
use crate::weight::{Weighted, WeightedMut};

pub const DEFAULT_TEXT: &str = "Add text";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_BORDER: &str = "#000000";
pub const DEFAULT_FONT: &str = "#000000";
pub const DEFAULT_BORDER_RADIUS: &str = "0px";

/// How tiles are arranged on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutType {
    Compact,
    #[default]
    Tiles,
    List,
}

/// Tile size preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSize {
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
    FillSpace,
}

impl TileSize {
    pub fn pixels(self) -> u32 {
        match self {
            TileSize::Small => 40,
            TileSize::Medium => 60,
            TileSize::Large => 80,
            TileSize::XLarge => 100,
            TileSize::FillSpace => 120,
        }
    }
}

/// A link a tile points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

/// One tile.
///
/// Older property bags only stored `title`, `text`, `icon` and two colors.
/// Missing fields take their defaults; a missing or `null` sort weight reads
/// as NaN so the board renumbers it on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blurb {
    #[serde(default = "BlurbId::generate")]
    pub id: BlurbId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<String>,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_border")]
    pub border_color: String,
    #[serde(default = "default_font")]
    pub font_color: String,
    #[serde(default = "default_border_radius")]
    pub border_radius: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(default = "unset_weight", deserialize_with = "null_as_nan")]
    pub sort_weight: f64,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_border() -> String {
    DEFAULT_BORDER.to_string()
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

fn default_border_radius() -> String {
    DEFAULT_BORDER_RADIUS.to_string()
}

fn unset_weight() -> f64 {
    f64::NAN
}

fn null_as_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|name| !name.is_empty()))
}

impl Blurb {
    /// A default tile. `number` is its 1-based position, used in the title.
    pub fn new(number: usize, sort_weight: f64) -> Blurb {
        Blurb {
            id: BlurbId::generate(),
            title: format!("Blurb {number}"),
            text: DEFAULT_TEXT.to_string(),
            icon: None,
            background_color: DEFAULT_BACKGROUND.to_string(),
            border_color: DEFAULT_BORDER.to_string(),
            font_color: DEFAULT_FONT.to_string(),
            border_radius: DEFAULT_BORDER_RADIUS.to_string(),
            link: None,
            sort_weight,
        }
    }

    /// Apply a partial edit. Colors are checked before anything changes.
    pub fn apply(&mut self, edit: BlurbEdit) -> Result<(), BoardError> {
        for color in [&edit.background_color, &edit.border_color, &edit.font_color]
            .into_iter()
            .flatten()
        {
            if !is_hex_color(color) {
                return Err(BoardError::InvalidColor { value: color.clone() });
            }
        }

        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(text) = edit.text {
            self.text = text;
        }
        if let Some(icon) = edit.icon {
            self.icon = icon.filter(|name| !name.is_empty());
        }
        if let Some(color) = edit.background_color {
            self.background_color = color;
        }
        if let Some(color) = edit.border_color {
            self.border_color = color;
        }
        if let Some(color) = edit.font_color {
            self.font_color = color;
        }
        if let Some(radius) = edit.border_radius {
            self.border_radius = radius;
        }
        if let Some(link) = edit.link {
            self.link = link;
        }
        Ok(())
    }

    /// Title to show; blank titles fall back to a placeholder.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() { "No Title" } else { &self.title }
    }
}

impl Weighted for Blurb {
    fn sort_weight(&self) -> f64 {
        self.sort_weight
    }
}

impl WeightedMut for Blurb {
    fn set_sort_weight(&mut self, weight: f64) {
        self.sort_weight = weight;
    }
}

/// A partial update to a blurb's appearance. `None` leaves a field alone;
/// for the optional fields `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlurbEdit {
    pub title: Option<String>,
    pub text: Option<String>,
    pub icon: Option<Option<String>>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub font_color: Option<String>,
    pub border_radius: Option<String>,
    pub link: Option<Option<Link>>,
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
