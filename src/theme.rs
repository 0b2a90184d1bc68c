use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub name_font_size: f32,
    pub dates_font_size: f32,
    pub background: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub link_color: String,
    pub link_width: f32,
    pub spouse_link_color: String,
    pub spouse_link_dasharray: String,
    pub name_color: String,
    pub dates_color: String,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "system-ui, -apple-system, Segoe UI, sans-serif".to_string(),
            name_font_size: 12.0,
            dates_font_size: 10.0,
            background: "#15171c".to_string(),
            node_fill: "#0b0c10".to_string(),
            node_stroke: "#666666".to_string(),
            node_stroke_width: 2.0,
            link_color: "#444444".to_string(),
            link_width: 2.0,
            spouse_link_color: "#777777".to_string(),
            spouse_link_dasharray: "6,6".to_string(),
            name_color: "#e8e8e8".to_string(),
            dates_color: "#bdbdbd".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            name_font_size: 12.0,
            dates_font_size: 10.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_stroke: "#7A8AA6".to_string(),
            node_stroke_width: 2.0,
            link_color: "#9AA6BA".to_string(),
            link_width: 2.0,
            spouse_link_color: "#7A8AA6".to_string(),
            spouse_link_dasharray: "6,6".to_string(),
            name_color: "#1C2430".to_string(),
            dates_color: "#5B6678".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
