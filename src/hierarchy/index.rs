use std::collections::{HashMap, HashSet};

use crate::model::{Dataset, Relationship, RelationshipRecord, SpousalKind};

use super::types::SpousePair;

/// Lookup tables over the relationship list.
///
/// Parent/child entries are indexed even when an endpoint is not a known
/// person; unresolved ids are filtered when the tables are consulted.
#[derive(Debug)]
pub struct RelationshipIndex<'a> {
    known: HashSet<&'a str>,
    children_by_parent: HashMap<&'a str, Vec<&'a str>>,
    parents_by_child: HashMap<&'a str, Vec<&'a str>>,
    spouse_pairs: Vec<SpousePair>,
}

impl<'a> RelationshipIndex<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        let known: HashSet<&str> = dataset.people.iter().map(|p| p.id.as_str()).collect();
        let mut index = Self {
            known,
            children_by_parent: HashMap::new(),
            parents_by_child: HashMap::new(),
            spouse_pairs: Vec::new(),
        };
        let mut spouse_keys = HashSet::new();

        for (idx, record) in dataset.relationships.iter().enumerate() {
            match index.classify(record) {
                Some(Relationship::ParentChild { parent, child }) => {
                    index.children_by_parent.entry(parent).or_default().push(child);
                    index.parents_by_child.entry(child).or_default().push(parent);
                }
                Some(Relationship::Spousal { a, b, .. }) => {
                    let pair = SpousePair::new(a, b);
                    if spouse_keys.insert(pair.key.clone()) {
                        index.spouse_pairs.push(pair);
                    }
                }
                None => {
                    tracing::debug!(index = idx, ?record, "skipping malformed relationship");
                }
            }
        }

        index
    }

    /// Spousal when the type says so and both ends are known people;
    /// otherwise parent/child when both fields are present.
    fn classify(&self, record: &'a RelationshipRecord) -> Option<Relationship<'a>> {
        if let Some(kind) = record.kind.as_deref().and_then(SpousalKind::from_token) {
            let (a, b) = (record.a.as_deref()?, record.b.as_deref()?);
            if self.is_known(a) && self.is_known(b) {
                return Some(Relationship::Spousal { kind, a, b });
            }
            return None;
        }
        Some(Relationship::ParentChild {
            parent: record.parent.as_deref()?,
            child: record.child.as_deref()?,
        })
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// Recorded children in relationship order, duplicates included.
    pub fn children_of(&self, parent: &str) -> &[&'a str] {
        self.children_by_parent.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recorded parents in relationship order, duplicates included.
    pub fn parents_of(&self, child: &str) -> &[&'a str] {
        self.parents_by_child.get(child).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_recorded_parent(&self, id: &str) -> bool {
        self.parents_by_child.contains_key(id)
    }

    pub fn spouse_pairs(&self) -> &[SpousePair] {
        &self.spouse_pairs
    }

    /// First co-parent of `person`: the first other known parent of the first
    /// child (in relationship order) that has two or more recorded parents.
    pub fn co_parent(&self, person: &str) -> Option<&'a str> {
        for child in self.children_of(person) {
            let parents = self.parents_of(child);
            if parents.len() < 2 {
                continue;
            }
            if let Some(other) = parents
                .iter()
                .copied()
                .find(|p| *p != person && self.is_known(p))
            {
                return Some(other);
            }
        }
        None
    }

    /// Children recorded with both `a` and `b` as parents, in `a`'s order.
    pub fn shared_children(&self, a: &str, b: &str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.children_of(a)
            .iter()
            .copied()
            .filter(|child| {
                let parents = self.parents_of(child);
                parents.iter().any(|p| *p == a) && parents.iter().any(|p| *p == b)
            })
            .filter(|child| seen.insert(*child))
            .collect()
    }

    /// Children whose only recorded parent is `parent`.
    pub fn sole_children(&self, parent: &str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.children_of(parent)
            .iter()
            .copied()
            .filter(|child| self.parents_of(child).len() == 1)
            .filter(|child| seen.insert(*child))
            .collect()
    }
}
