use crate::hierarchy::Hierarchy;
use crate::layout::{AnchorMap, SpouseEdge, TreeLayout, UnitKind};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub empty: bool,
    pub unit_count: usize,
    pub units: Vec<UnitDump>,
    pub links: Vec<[usize; 2]>,
    pub spouse_edges: Vec<SpouseEdgeDump>,
    pub couple_keys: Vec<String>,
    pub anchors: Vec<AnchorDump>,
}

#[derive(Debug, Serialize)]
pub struct UnitDump {
    pub index: usize,
    pub kind: String,
    pub people: Vec<String>,
    pub depth: usize,
    pub parent: Option<usize>,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct SpouseEdgeDump {
    pub key: String,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct AnchorDump {
    pub person: String,
    pub x: f32,
    pub y: f32,
}

impl LayoutDump {
    pub fn from_layout(
        layout: &TreeLayout,
        hierarchy: &Hierarchy,
        anchors: &AnchorMap,
        spouse_edges: &[SpouseEdge],
    ) -> Self {
        let units = layout
            .units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                let (kind, people) = match &unit.kind {
                    UnitKind::Person { id } => ("person", vec![id.clone()]),
                    UnitKind::Couple { a, b } => ("couple", vec![a.clone(), b.clone()]),
                    UnitKind::SuperRoot => ("superroot", Vec::new()),
                };
                UnitDump {
                    index,
                    kind: kind.to_string(),
                    people,
                    depth: unit.depth,
                    parent: unit.parent,
                    x: unit.x,
                    y: unit.y,
                }
            })
            .collect();

        let mut anchor_dump = Vec::new();
        for person in hierarchy.placed_people() {
            if let Some(point) = anchors.get(person) {
                anchor_dump.push(AnchorDump {
                    person: person.to_string(),
                    x: point.x,
                    y: point.y,
                });
            }
        }

        LayoutDump {
            empty: layout.is_empty(),
            unit_count: layout.units.len(),
            units,
            links: layout
                .links
                .iter()
                .map(|link| [link.source, link.target])
                .collect(),
            spouse_edges: spouse_edges
                .iter()
                .map(|edge| SpouseEdgeDump {
                    key: edge.key.clone(),
                    points: vec![[edge.from.x, edge.from.y], [edge.to.x, edge.to.y]],
                })
                .collect(),
            couple_keys: hierarchy.couple_keys.iter().cloned().collect(),
            anchors: anchor_dump,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &TreeLayout,
    hierarchy: &Hierarchy,
    anchors: &AnchorMap,
    spouse_edges: &[SpouseEdge],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, hierarchy, anchors, spouse_edges);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
