use std::collections::{BTreeSet, HashSet};

use super::index::RelationshipIndex;
use super::types::{Unit, pair_key};

/// State for one transform call. Owns the set of people already placed in a
/// unit, so nobody is placed twice and cyclic data terminates.
pub struct BuildContext<'i, 'a> {
    index: &'i RelationshipIndex<'a>,
    placed: HashSet<&'a str>,
    couple_keys: BTreeSet<String>,
}

impl<'i, 'a> BuildContext<'i, 'a> {
    pub fn new(index: &'i RelationshipIndex<'a>) -> Self {
        Self {
            index,
            placed: HashSet::new(),
            couple_keys: BTreeSet::new(),
        }
    }

    pub fn index(&self) -> &'i RelationshipIndex<'a> {
        self.index
    }

    pub fn is_placed(&self, person: &str) -> bool {
        self.placed.contains(person)
    }

    pub fn into_couple_keys(self) -> BTreeSet<String> {
        self.couple_keys
    }

    /// Builds the unit representing `person`, together with its subtree.
    ///
    /// Returns `None` for unknown people and for people already placed.
    /// Descendants are built depth-first on an explicit stack, so long
    /// lineages do not grow the call stack.
    pub fn build_unit_for(&mut self, person: &'a str) -> Option<Unit> {
        let mut stack = vec![self.open(person)?];
        loop {
            let top = stack.last_mut()?;
            if let Some(child) = top.pending.next() {
                if let Some(frame) = self.open(child) {
                    stack.push(frame);
                }
                continue;
            }
            let unit = stack.pop()?.finish();
            match stack.last_mut() {
                Some(parent) => parent.built.push(unit),
                None => return Some(unit),
            }
        }
    }

    /// Places `person` (with a co-parent when one is still free) and lists
    /// the children to build under the new unit.
    fn open(&mut self, person: &'a str) -> Option<Frame<'a>> {
        if !self.index.is_known(person) || self.is_placed(person) {
            return None;
        }

        if let Some(partner) = self.index.co_parent(person)
            && !self.is_placed(partner)
        {
            self.placed.insert(person);
            self.placed.insert(partner);
            self.couple_keys.insert(pair_key(person, partner));
            let child_ids = self.index.shared_children(person, partner);
            return Some(Frame::new(Head::Couple(person, partner), child_ids));
        }

        // Two-parent children are left to the couple path, even when the
        // couple could not be formed.
        self.placed.insert(person);
        let child_ids = self.index.sole_children(person);
        Some(Frame::new(Head::Person(person), child_ids))
    }
}

enum Head<'a> {
    Person(&'a str),
    Couple(&'a str, &'a str),
}

/// A unit whose children are still being built.
struct Frame<'a> {
    head: Head<'a>,
    pending: std::vec::IntoIter<&'a str>,
    built: Vec<Unit>,
}

impl<'a> Frame<'a> {
    fn new(head: Head<'a>, child_ids: Vec<&'a str>) -> Self {
        Self {
            head,
            pending: child_ids.into_iter(),
            built: Vec::new(),
        }
    }

    fn finish(self) -> Unit {
        let children = if self.built.is_empty() {
            None
        } else {
            Some(self.built)
        };
        match self.head {
            Head::Person(person) => Unit::Person {
                person_id: person.to_string(),
                children,
            },
            Head::Couple(a, b) => Unit::Couple {
                parent_ids: (a.to_string(), b.to_string()),
                children,
            },
        }
    }
}
