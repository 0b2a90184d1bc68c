use family_tree_renderer::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_render_options(options: FamilyRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("light") {
        RenderOptions::light()
    } else {
        RenderOptions::dark()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.name_font_size = font_size;
        render_options.theme.dates_font_size = (font_size - 2.0).max(1.0);
    }

    render_options
}

/// Renders a `{people, relationships}` document to SVG.
#[wasm_bindgen]
pub fn render_family_svg(dataset_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FamilyRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FamilyRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(dataset_json, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use family_tree_renderer::render_with_options;

    use crate::{FamilyRenderOptions, build_render_options};

    #[test]
    fn renders_couple_with_child() {
        let dataset = r#"{
            "people": [
                {"id": "a", "name": "Ann", "born": "1950"},
                {"id": "b", "name": "Bob"},
                {"id": "c", "name": "Cleo"}
            ],
            "relationships": [
                {"parent": "a", "child": "c"},
                {"parent": "b", "child": "c"}
            ]
        }"#;

        let svg = render_with_options(dataset, build_render_options(FamilyRenderOptions::default()))
            .expect("couple with child should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ann  +  Bob"));
        assert!(svg.contains("Cleo"));
        assert!(!svg.contains("spouse-link"));
    }

    #[test]
    fn applies_font_and_theme_overrides() {
        let options = build_render_options(FamilyRenderOptions {
            theme: Some("light".to_string()),
            font_family: Some("Georgia".to_string()),
            font_size: Some(16.0),
        });
        assert_eq!(options.theme.font_family, "Georgia");
        assert_eq!(options.theme.name_font_size, 16.0);
        assert_eq!(options.theme.dates_font_size, 14.0);
    }
}
