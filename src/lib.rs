pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod hierarchy;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod parser;
pub mod render;
pub mod store;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use hierarchy::{Hierarchy, Unit, build_hierarchy};
pub use layout::{AnchorMap, SpouseEdge, TreeLayout, compute_layout, spouse_edges};
pub use model::{Dataset, Person, RelationshipRecord};
pub use parser::{DatasetError, parse_dataset};
pub use render::render_svg;
pub use theme::Theme;

/// Everything computed from one dataset snapshot, ready to draw.
#[derive(Debug, Clone)]
pub struct FamilyTree {
    pub hierarchy: Hierarchy,
    pub layout: TreeLayout,
    pub anchors: AnchorMap,
    pub spouse_edges: Vec<SpouseEdge>,
}

impl FamilyTree {
    pub fn build(dataset: &Dataset, config: &LayoutConfig) -> Self {
        let hierarchy = build_hierarchy(dataset);
        let layout = compute_layout(&hierarchy, config);
        let anchors = AnchorMap::from_layout(&layout, config);
        let spouse_edges = spouse_edges(&hierarchy, &anchors);
        Self {
            hierarchy,
            layout,
            anchors,
            spouse_edges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty()
    }

    pub fn to_svg(&self, dataset: &Dataset, theme: &Theme, config: &LayoutConfig) -> String {
        render_svg(&self.layout, &self.spouse_edges, dataset, theme, config)
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn light() -> Self {
        Self {
            theme: Theme::light(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::dark()
    }
}

/// Parses dataset text and renders it to SVG in one call.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let dataset = parse_dataset(input)?;
    let tree = FamilyTree::build(&dataset, &options.layout);
    Ok(tree.to_svg(&dataset, &options.theme, &options.layout))
}
