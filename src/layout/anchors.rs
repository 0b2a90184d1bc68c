use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::hierarchy::Hierarchy;

use super::types::{Point, SpouseEdge, TreeLayout, UnitKind};

/// Where each person is drawn once the tree has been laid out.
///
/// Couple partners sit on either side of their unit's center; a person unit
/// anchors at its own position. The first assignment for a person wins.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    anchors: HashMap<String, Point>,
}

impl AnchorMap {
    pub fn from_layout(layout: &TreeLayout, config: &LayoutConfig) -> Self {
        let offset = config.couple_offset();
        let mut map = Self::default();
        for unit in &layout.units {
            match &unit.kind {
                UnitKind::Couple { a, b } => {
                    map.assign(a, Point::new(unit.x - offset, unit.y));
                    map.assign(b, Point::new(unit.x + offset, unit.y));
                }
                UnitKind::Person { id } => map.assign(id, unit.position()),
                UnitKind::SuperRoot => {}
            }
        }
        map
    }

    fn assign(&mut self, person: &str, point: Point) {
        if !self.anchors.contains_key(person) {
            self.anchors.insert(person.to_string(), point);
        }
    }

    pub fn get(&self, person: &str) -> Option<Point> {
        self.anchors.get(person).copied()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// One dashed edge per spouse pair that is not already a couple unit and
/// whose partners both appear in the tree.
pub fn spouse_edges(hierarchy: &Hierarchy, anchors: &AnchorMap) -> Vec<SpouseEdge> {
    let mut edges = Vec::new();
    for pair in &hierarchy.spouse_pairs {
        if hierarchy.couple_keys.contains(&pair.key) {
            continue;
        }
        let (Some(from), Some(to)) = (anchors.get(&pair.a), anchors.get(&pair.b)) else {
            tracing::trace!(key = %pair.key, "spouse edge skipped, partner not in tree");
            continue;
        };
        edges.push(SpouseEdge {
            key: pair.key.clone(),
            from,
            to,
        });
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{SpousePair, build_hierarchy};
    use crate::layout::{UnitLayout, compute_layout};
    use crate::model::{Dataset, Person, RelationshipRecord};

    fn unit(kind: UnitKind, x: f32, y: f32) -> UnitLayout {
        UnitLayout {
            kind,
            depth: 0,
            parent: None,
            x,
            y,
        }
    }

    #[test]
    fn couple_partners_anchor_on_either_side() {
        let layout = TreeLayout {
            units: vec![unit(
                UnitKind::Couple {
                    a: "a".to_string(),
                    b: "b".to_string(),
                },
                100.0,
                0.0,
            )],
            ..Default::default()
        };
        let anchors = AnchorMap::from_layout(&layout, &LayoutConfig::default());
        assert_eq!(anchors.get("a"), Some(Point::new(60.0, 0.0)));
        assert_eq!(anchors.get("b"), Some(Point::new(140.0, 0.0)));
    }

    #[test]
    fn first_assignment_wins() {
        let layout = TreeLayout {
            units: vec![
                unit(UnitKind::Person { id: "a".to_string() }, 0.0, 0.0),
                unit(UnitKind::Person { id: "a".to_string() }, 50.0, 150.0),
                unit(UnitKind::SuperRoot, 9.0, 9.0),
            ],
            ..Default::default()
        };
        let anchors = AnchorMap::from_layout(&layout, &LayoutConfig::default());
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors.get("a"), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn spouse_edge_drawn_for_childless_pair() {
        let dataset = Dataset {
            people: vec![Person::new("A", "Ann"), Person::new("B", "Bob")],
            relationships: vec![RelationshipRecord::spousal("spouse", "A", "B")],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(&dataset);
        let config = LayoutConfig::default();
        let anchors = AnchorMap::from_layout(&compute_layout(&hierarchy, &config), &config);
        let edges = spouse_edges(&hierarchy, &anchors);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].key, "A+B");
        assert_eq!(edges[0].from, anchors.get("A").unwrap());
    }

    #[test]
    fn spouse_edge_suppressed_for_realized_couple() {
        let dataset = Dataset {
            people: ["A", "B", "C"].iter().map(|id| Person::new(id, id)).collect(),
            relationships: vec![
                RelationshipRecord::spousal("spouse", "B", "A"),
                RelationshipRecord::parent_child("A", "C"),
                RelationshipRecord::parent_child("B", "C"),
            ],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(&dataset);
        let config = LayoutConfig::default();
        let anchors = AnchorMap::from_layout(&compute_layout(&hierarchy, &config), &config);
        assert!(spouse_edges(&hierarchy, &anchors).is_empty());
    }

    #[test]
    fn spouse_edge_skipped_when_partner_missing_from_tree() {
        let hierarchy = Hierarchy {
            spouse_pairs: vec![SpousePair::new("a", "b")],
            ..Default::default()
        };
        let layout = TreeLayout {
            units: vec![unit(UnitKind::Person { id: "a".to_string() }, 0.0, 0.0)],
            ..Default::default()
        };
        let anchors = AnchorMap::from_layout(&layout, &LayoutConfig::default());
        assert!(spouse_edges(&hierarchy, &anchors).is_empty());
    }
}
