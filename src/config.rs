use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal size of one sibling slot.
    pub node_spacing: f32,
    /// Vertical distance between generations.
    pub rank_spacing: f32,
    pub node_radius: f32,
    /// Gap between the two circles of a couple.
    pub couple_gap: f32,
    pub margin: f32,
    /// Slots between siblings / between cousins.
    pub sibling_separation: f32,
    pub subtree_separation: f32,
}

impl LayoutConfig {
    /// Horizontal distance from a couple's center to each partner.
    pub fn couple_offset(&self) -> f32 {
        self.node_radius + self.couple_gap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 110.0,
            rank_spacing: 150.0,
            node_radius: 28.0,
            couple_gap: 12.0,
            margin: 40.0,
            sibling_separation: 1.0,
            subtree_separation: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: Theme::dark().background,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::dark();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    name_font_size: Option<f32>,
    dates_font_size: Option<f32>,
    background: Option<String>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    node_stroke_width: Option<f32>,
    link_color: Option<String>,
    link_width: Option<f32>,
    spouse_link_color: Option<String>,
    spouse_link_dasharray: Option<String>,
    name_color: Option<String>,
    dates_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    node_radius: Option<f32>,
    couple_gap: Option<f32>,
    margin: Option<f32>,
    sibling_separation: Option<f32>,
    subtree_separation: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_spacing {
            config.layout.node_spacing = v;
        }
        if let Some(v) = layout.rank_spacing {
            config.layout.rank_spacing = v;
        }
        if let Some(v) = layout.node_radius {
            config.layout.node_radius = v;
        }
        if let Some(v) = layout.couple_gap {
            config.layout.couple_gap = v;
        }
        if let Some(v) = layout.margin {
            config.layout.margin = v;
        }
        if let Some(v) = layout.sibling_separation {
            config.layout.sibling_separation = v;
        }
        if let Some(v) = layout.subtree_separation {
            config.layout.subtree_separation = v;
        }
    }

    config.render.background = config.theme.background.clone();
    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.name_font_size {
        theme.name_font_size = v;
    }
    if let Some(v) = vars.dates_font_size {
        theme.dates_font_size = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
    if let Some(v) = vars.node_fill {
        theme.node_fill = v;
    }
    if let Some(v) = vars.node_stroke {
        theme.node_stroke = v;
    }
    if let Some(v) = vars.node_stroke_width {
        theme.node_stroke_width = v;
    }
    if let Some(v) = vars.link_color {
        theme.link_color = v;
    }
    if let Some(v) = vars.link_width {
        theme.link_width = v;
    }
    if let Some(v) = vars.spouse_link_color {
        theme.spouse_link_color = v;
    }
    if let Some(v) = vars.spouse_link_dasharray {
        theme.spouse_link_dasharray = v;
    }
    if let Some(v) = vars.name_color {
        theme.name_color = v;
    }
    if let Some(v) = vars.dates_color {
        theme.dates_color = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tree_node_size() {
        let config = Config::default();
        assert_eq!(config.layout.node_spacing, 110.0);
        assert_eq!(config.layout.rank_spacing, 150.0);
        assert_eq!(config.layout.couple_offset(), 40.0);
    }

    #[test]
    fn config_file_overrides_theme_and_layout() {
        let config = parse_config(
            r##"{
                "theme": "light",
                "themeVariables": {"nameColor": "#000000", "nameFontSize": 14},
                "layout": {"rankSpacing": 120, "coupleGap": 8},
                "somethingElse": true
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.name_color, "#000000");
        assert_eq!(config.theme.name_font_size, 14.0);
        assert_eq!(config.theme.background, Theme::light().background);
        assert_eq!(config.render.background, Theme::light().background);
        assert_eq!(config.layout.rank_spacing, 120.0);
        assert_eq!(config.layout.couple_offset(), 36.0);
        assert_eq!(config.layout.node_spacing, 110.0);
    }

    #[test]
    fn unknown_theme_keeps_default() {
        let config = parse_config(r#"{"theme": "neon"}"#).unwrap();
        assert_eq!(config.theme.node_fill, Theme::dark().node_fill);
    }

    #[test]
    fn missing_path_is_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_radius, 28.0);
    }
}
