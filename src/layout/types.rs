use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UnitKind {
    Person { id: String },
    Couple { a: String, b: String },
    #[serde(rename = "superroot")]
    SuperRoot,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitLayout {
    #[serde(flatten)]
    pub kind: UnitKind,
    pub depth: usize,
    pub parent: Option<usize>,
    pub x: f32,
    pub y: f32,
}

impl UnitLayout {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkLayout {
    pub source: usize,
    pub target: usize,
}

/// Positioned units in breadth-first order (root first) and the
/// parent-to-child links between them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    pub units: Vec<UnitLayout>,
    pub links: Vec<LinkLayout>,
    pub min_x: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl TreeLayout {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Auxiliary edge between two spouses that were not merged into a couple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpouseEdge {
    pub key: String,
    pub from: Point,
    pub to: Point,
}
