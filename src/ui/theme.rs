use std::fs;

use ratatui::style::{Color, Modifier, Style};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: String,
    pub header_fg: String,
    pub menu: Palette,
    pub help: Palette,
    pub modal: Palette,
}

/// Colours for one family of panes. Each maps onto a `PaneColours` role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Palette {
    pub bg: String,
    pub fg: String,
    pub bright: String,
    pub highlight_fg: String,
    pub highlight_bg: String,
    pub selected_fg: String,
    pub selected_bg: String,
    pub flash: String,
}

/// Resolved styles used by a pane's field builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneColours {
    pub base: Style,
    pub bright: Style,
    pub highlight: Style,
    pub selected: Style,
    pub title: Style,
    pub flash: Style,
}

impl Default for PaneColours {
    fn default() -> Self {
        Palette::default().colours()
    }
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("hostconsole")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    pub fn background(&self) -> Style {
        Style::default().bg(parse_color(&self.background))
    }

    pub fn header(&self) -> Style {
        self.background()
            .fg(parse_color(&self.header_fg))
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("classic").unwrap_or_else(|| Self {
            name: "default".to_string(),
            background: "#000000".to_string(),
            header_fg: "#ffffff".to_string(),
            menu: Palette::default(),
            help: Palette::default(),
            modal: Palette::default(),
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            bright: "#ffffff".to_string(),
            highlight_fg: "#f9e2af".to_string(),
            highlight_bg: "#313244".to_string(),
            selected_fg: "#1e1e2e".to_string(),
            selected_bg: "#89b4fa".to_string(),
            flash: "#f38ba8".to_string(),
        }
    }
}

impl Palette {
    pub fn colours(&self) -> PaneColours {
        let base = Style::default()
            .fg(parse_color(&self.fg))
            .bg(parse_color(&self.bg));
        let bright = base.fg(parse_color(&self.bright)).add_modifier(Modifier::BOLD);
        PaneColours {
            base,
            bright,
            highlight: base
                .fg(parse_color(&self.highlight_fg))
                .bg(parse_color(&self.highlight_bg)),
            selected: base
                .fg(parse_color(&self.selected_fg))
                .bg(parse_color(&self.selected_bg)),
            title: bright,
            flash: base.fg(parse_color(&self.flash)).add_modifier(Modifier::BOLD),
        }
    }
}

pub fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 && hex.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::White
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"classic".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn parse_color_handles_bad_input() {
        assert_eq!(parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(parse_color("nonsense"), Color::White);
    }

    #[test]
    fn parse_color_rejects_multibyte_input() {
        // six bytes, but the first pair splits the 'é'
        assert_eq!(parse_color("#aébcd"), Color::White);
        assert_eq!(parse_color("#ééé"), Color::White);
    }

    #[test]
    fn selected_differs_from_base() {
        let colours = Palette::default().colours();
        assert_ne!(colours.base, colours.selected);
        assert_eq!(colours.title, colours.bright);
    }
}
