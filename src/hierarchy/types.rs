use std::collections::BTreeSet;

use serde::Serialize;

/// A node of the display hierarchy.
///
/// `children` is `None` for leaves; a `Some` vector is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Unit {
    Person {
        #[serde(rename = "id")]
        person_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        children: Option<Vec<Unit>>,
    },
    Couple {
        #[serde(rename = "parents")]
        parent_ids: (String, String),
        #[serde(skip_serializing_if = "Option::is_none")]
        children: Option<Vec<Unit>>,
    },
    #[serde(rename = "superroot")]
    SuperRoot { children: Vec<Unit> },
}

impl Unit {
    pub fn children(&self) -> &[Unit] {
        match self {
            Unit::Person { children, .. } | Unit::Couple { children, .. } => {
                children.as_deref().unwrap_or(&[])
            }
            Unit::SuperRoot { children } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// People represented by this unit itself (not its descendants).
    pub fn people(&self) -> Vec<&str> {
        match self {
            Unit::Person { person_id, .. } => vec![person_id.as_str()],
            Unit::Couple { parent_ids, .. } => vec![parent_ids.0.as_str(), parent_ids.1.as_str()],
            Unit::SuperRoot { .. } => Vec::new(),
        }
    }

    /// Pre-order walk over this unit and all of its descendants.
    pub fn walk(&self) -> Vec<&Unit> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(unit) = stack.pop() {
            out.push(unit);
            for child in unit.children().iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// An undirected spouse/partner pair, keyed by the sorted ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpousePair {
    pub key: String,
    pub a: String,
    pub b: String,
}

impl SpousePair {
    pub fn new(a: &str, b: &str) -> Self {
        Self {
            key: pair_key(a, b),
            a: a.to_string(),
            b: b.to_string(),
        }
    }
}

pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}+{b}")
    } else {
        format!("{b}+{a}")
    }
}

/// Output of the graph-to-hierarchy transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    /// `None` when no root could be produced (empty dataset).
    pub root: Option<Unit>,
    pub spouse_pairs: Vec<SpousePair>,
    /// Keys of the couples realized as `Unit::Couple` nodes.
    pub couple_keys: BTreeSet<String>,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn units(&self) -> Vec<&Unit> {
        self.root.as_ref().map(Unit::walk).unwrap_or_default()
    }

    /// Every person id placed somewhere in the tree, in pre-order.
    pub fn placed_people(&self) -> Vec<&str> {
        self.units().into_iter().flat_map(|unit| unit.people()).collect()
    }
}
