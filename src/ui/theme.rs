use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use tracing::warn;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

/// A `#rrggbb` colour, checked when the theme is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor(pub Color);

impl HexColor {
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some(Self(Color::Rgb(channel(0)?, channel(2)?, channel(4)?)))
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid colour {text:?}, expected #rrggbb")))
    }
}

// Every role needs a key in the theme file; the literal is the built-in fallback.
macro_rules! palette {
    ($($role:ident => $fallback:literal,)+) => {
        #[derive(Clone, Debug, Deserialize)]
        pub struct ThemeColors {
            $(pub $role: HexColor,)+
        }

        impl Default for ThemeColors {
            fn default() -> Self {
                Self {
                    $($role: HexColor::parse($fallback).unwrap_or(HexColor(Color::Reset)),)+
                }
            }
        }

        impl ThemeColors {
            $(
                pub fn $role(&self) -> Color {
                    self.$role.0
                }
            )+
        }
    };
}

palette! {
    bg => "#1e1e2e",
    fg => "#cdd6f4",
    text_correct => "#a6e3a1",
    text_incorrect => "#f38ba8",
    text_incorrect_bg => "#45273a",
    text_pending => "#585b70",
    text_cursor_bg => "#f5e0dc",
    text_cursor_fg => "#1e1e2e",
    accent => "#89b4fa",
    border => "#45475a",
    header_bg => "#313244",
    header_fg => "#cdd6f4",
    bar_filled => "#89b4fa",
    bar_empty => "#313244",
    error => "#f38ba8",
    warning => "#f9e2af",
    success => "#a6e3a1",
}

#[derive(Clone, Debug, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

impl Theme {
    /// Looks in the user theme directory first, then the bundled themes.
    pub fn load(name: &str) -> Option<Self> {
        let user_theme = user_theme_dir()
            .map(|dir| dir.join(format!("{name}.toml")))
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| Self::parse(name, &content));
        if user_theme.is_some() {
            return user_theme;
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        Self::parse(name, content)
    }

    pub fn parse(name: &str, content: &str) -> Option<Self> {
        match toml::from_str::<Theme>(content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!(theme = name, %err, "theme rejected");
                None
            }
        }
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "built-in".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

fn user_theme_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("neotype").join("themes"))
}
