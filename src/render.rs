use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{Point, SpouseEdge, TreeLayout, UnitKind};
use crate::model::{Dataset, Person};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const EMPTY_MESSAGE: &str = "No data to render.";
const RING_PAD: f32 = 3.0;
const NAME_OFFSET: f32 = 18.0;
const DATES_OFFSET: f32 = 34.0;

/// Drawing frame: translation applied to layout coordinates plus canvas size.
struct Frame {
    dx: f32,
    dy: f32,
    width: f32,
    height: f32,
}

impl Frame {
    fn new(layout: &TreeLayout, theme: &Theme, config: &LayoutConfig) -> Self {
        let ring = config.node_radius + RING_PAD;
        let side = config.margin + config.couple_offset() + ring;
        let top = config.margin + ring;
        let bottom = config.node_radius + DATES_OFFSET + theme.dates_font_size + config.margin;
        Self {
            dx: side - layout.min_x,
            dy: top,
            width: (layout.max_x - layout.min_x) + side * 2.0,
            height: layout.max_y + top + bottom,
        }
    }

    fn at(&self, x: f32, y: f32) -> Point {
        Point::new(x + self.dx, y + self.dy)
    }
}

pub fn render_svg(
    layout: &TreeLayout,
    spouse_edges: &[SpouseEdge],
    dataset: &Dataset,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    if layout.is_empty() {
        return render_empty_svg(theme);
    }

    let people: HashMap<&str, &Person> = dataset
        .people
        .iter()
        .map(|person| (person.id.as_str(), person))
        .collect();
    let frame = Frame::new(layout, theme, config);
    let (width, height) = (frame.width, frame.height);
    let r = config.node_radius;
    let offset = config.couple_offset();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    for (idx, unit) in layout.units.iter().enumerate() {
        match unit.kind {
            UnitKind::Couple { .. } => {
                svg.push_str(&clip_path(&format!("clip-{idx}-a"), -offset, r));
                svg.push_str(&clip_path(&format!("clip-{idx}-b"), offset, r));
            }
            UnitKind::Person { .. } => {
                svg.push_str(&clip_path(&format!("clip-{idx}"), 0.0, r));
            }
            UnitKind::SuperRoot => {}
        }
    }
    svg.push_str("</defs>");

    for link in &layout.links {
        let source = &layout.units[link.source];
        if source.kind == UnitKind::SuperRoot {
            continue;
        }
        let target = &layout.units[link.target];
        let from = frame.at(source.x, source.y);
        let to = frame.at(target.x, target.y);
        let mid_y = (from.y + to.y) / 2.0;
        svg.push_str(&format!(
            "<path class=\"link\" d=\"M {:.2} {:.2} V {mid_y:.2} H {:.2} V {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            from.x, from.y, to.x, to.y, theme.link_color, theme.link_width
        ));
    }

    for (idx, unit) in layout.units.iter().enumerate() {
        let origin = frame.at(unit.x, unit.y);
        match &unit.kind {
            UnitKind::SuperRoot => {}
            UnitKind::Couple { a, b } => {
                let pa = people.get(a.as_str()).copied();
                let pb = people.get(b.as_str()).copied();
                svg.push_str(&format!(
                    "<g class=\"node couple\" transform=\"translate({:.2},{:.2})\">",
                    origin.x, origin.y
                ));
                svg.push_str(&ring_svg(-offset, r, theme));
                svg.push_str(&ring_svg(offset, r, theme));
                svg.push_str(&photo_svg(pa, -offset, r, &format!("clip-{idx}-a")));
                svg.push_str(&photo_svg(pb, offset, r, &format!("clip-{idx}-b")));
                let label = format!("{}  +  {}", display_name(pa), display_name(pb));
                svg.push_str(&name_svg(&label, r, theme));
                svg.push_str("</g>");
            }
            UnitKind::Person { id } => {
                let person = people.get(id.as_str()).copied();
                svg.push_str(&format!(
                    "<g class=\"node person\" transform=\"translate({:.2},{:.2})\">",
                    origin.x, origin.y
                ));
                svg.push_str(&ring_svg(0.0, r, theme));
                svg.push_str(&photo_svg(person, 0.0, r, &format!("clip-{idx}")));
                svg.push_str(&name_svg(display_name(person), r, theme));
                let dates = person.map(dates_label).unwrap_or_default();
                if !dates.is_empty() {
                    svg.push_str(&format!(
                        "<text dy=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                        r + DATES_OFFSET,
                        escape_xml(&theme.font_family),
                        theme.dates_font_size,
                        theme.dates_color,
                        escape_xml(&dates)
                    ));
                }
                svg.push_str("</g>");
            }
        }
    }

    for edge in spouse_edges {
        let from = frame.at(edge.from.x, edge.from.y);
        let to = frame.at(edge.to.x, edge.to.y);
        let mid_x = (from.x + to.x) / 2.0;
        svg.push_str(&format!(
            "<path class=\"spouse-link\" d=\"M {:.2} {:.2} H {mid_x:.2} V {:.2} H {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"{}\"/>",
            from.x, from.y, to.y, to.x, theme.spouse_link_color, theme.link_width, theme.spouse_link_dasharray
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Explicit empty state, distinct from "nothing loaded yet".
pub fn render_empty_svg(theme: &Theme) -> String {
    let (width, height) = (320.0, 80.0);
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><rect width=\"100%\" height=\"100%\" fill=\"{}\"/><text x=\"16\" y=\"32\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></svg>",
        theme.background,
        escape_xml(&theme.font_family),
        theme.name_font_size,
        theme.name_color,
        EMPTY_MESSAGE
    )
}

fn clip_path(id: &str, cx: f32, r: f32) -> String {
    format!("<clipPath id=\"{id}\"><circle r=\"{r}\" cx=\"{cx:.2}\" cy=\"0\"/></clipPath>")
}

fn ring_svg(cx: f32, r: f32, theme: &Theme) -> String {
    format!(
        "<circle r=\"{}\" cx=\"{cx:.2}\" cy=\"0\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        r + RING_PAD,
        theme.node_fill,
        theme.node_stroke,
        theme.node_stroke_width
    )
}

fn photo_svg(person: Option<&Person>, cx: f32, r: f32, clip_id: &str) -> String {
    let Some(photo) = person.map(Person::photo).filter(|photo| !photo.is_empty()) else {
        return String::new();
    };
    format!(
        "<image href=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" clip-path=\"url(#{clip_id})\" preserveAspectRatio=\"xMidYMid slice\"/>",
        escape_xml(photo),
        cx - r,
        -r,
        r * 2.0,
        r * 2.0
    )
}

fn name_svg(label: &str, r: f32, theme: &Theme) -> String {
    format!(
        "<text dy=\"{:.2}\" text-anchor=\"middle\" xml:space=\"preserve\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        r + NAME_OFFSET,
        escape_xml(&theme.font_family),
        theme.name_font_size,
        theme.name_color,
        escape_xml(label)
    )
}

fn display_name(person: Option<&Person>) -> &str {
    person.map(|p| p.name.as_str()).unwrap_or("")
}

fn dates_label(person: &Person) -> String {
    let born = person.born();
    let died = person.died();
    let mut parts = Vec::new();
    if !born.is_empty() {
        parts.push(format!("b. {born}"));
    }
    if !died.is_empty() {
        parts.push(format!("d. {died}"));
    }
    parts.join("  ")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy;
    use crate::layout::{AnchorMap, compute_layout, spouse_edges};
    use crate::model::RelationshipRecord;

    fn render(dataset: &Dataset) -> String {
        let theme = Theme::dark();
        let config = LayoutConfig::default();
        let hierarchy = build_hierarchy(dataset);
        let layout = compute_layout(&hierarchy, &config);
        let edges = spouse_edges(&hierarchy, &AnchorMap::from_layout(&layout, &config));
        render_svg(&layout, &edges, dataset, &theme, &config)
    }

    #[test]
    fn render_svg_basic() {
        let mut ann = Person::new("a", "Ann & Co");
        ann.born = Some("1901".to_string());
        ann.photo = Some("/static/uploads/ann.png".to_string());
        let dataset = Dataset {
            people: vec![ann, Person::new("b", "Ben")],
            relationships: vec![RelationshipRecord::parent_child("a", "b")],
            ..Default::default()
        };
        let svg = render(&dataset);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Ann &amp; Co"));
        assert!(svg.contains("b. 1901"));
        assert!(svg.contains("href=\"/static/uploads/ann.png\""));
        assert_eq!(svg.matches("class=\"link\"").count(), 1);
        assert!(!svg.contains("spouse-link"));
    }

    #[test]
    fn couple_label_joins_names() {
        let dataset = Dataset {
            people: vec![
                Person::new("a", "Ann"),
                Person::new("b", "Bob"),
                Person::new("c", "Cy"),
            ],
            relationships: vec![
                RelationshipRecord::parent_child("a", "c"),
                RelationshipRecord::parent_child("b", "c"),
            ],
            ..Default::default()
        };
        let svg = render(&dataset);
        assert!(svg.contains("Ann  +  Bob"));
        assert!(svg.contains("clip-0-a"));
        assert!(svg.contains("clip-0-b"));
    }

    #[test]
    fn spouse_edges_are_dashed_and_super_root_links_hidden() {
        let dataset = Dataset {
            people: vec![Person::new("a", "Ann"), Person::new("b", "Bob")],
            relationships: vec![RelationshipRecord::spousal("partner", "a", "b")],
            ..Default::default()
        };
        let svg = render(&dataset);
        assert_eq!(svg.matches("class=\"spouse-link\"").count(), 1);
        assert!(svg.contains("stroke-dasharray=\"6,6\""));
        assert!(!svg.contains("class=\"link\""));
    }

    #[test]
    fn empty_layout_renders_empty_state() {
        let svg = render(&Dataset::default());
        assert!(svg.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn dates_label_omits_missing_parts() {
        let mut person = Person::new("a", "Ann");
        assert_eq!(dates_label(&person), "");
        person.died = Some("1980".to_string());
        assert_eq!(dates_label(&person), "d. 1980");
        person.born = Some("1900".to_string());
        assert_eq!(dates_label(&person), "b. 1900  d. 1980");
    }
}
