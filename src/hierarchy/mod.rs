//! Graph-to-hierarchy transform.
//!
//! Turns the flat people/relationship lists into one rooted tree of display
//! units. Co-parents are merged into a single couple unit, every person is
//! placed at most once, and spouse pairs that did not become couples are kept
//! aside so they can be drawn as extra edges once the tree is laid out.

mod builder;
mod index;
mod roots;
pub(crate) mod types;

pub use builder::BuildContext;
pub use index::RelationshipIndex;
pub use roots::assemble_root;
pub use types::*;

use crate::model::Dataset;

pub fn build_hierarchy(dataset: &Dataset) -> Hierarchy {
    let index = RelationshipIndex::new(dataset);
    let mut ctx = BuildContext::new(&index);
    let root = assemble_root(dataset, &mut ctx);
    Hierarchy {
        root,
        spouse_pairs: index.spouse_pairs().to_vec(),
        couple_keys: ctx.into_couple_keys(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Person, RelationshipRecord};

    fn people(ids: &[&str]) -> Vec<Person> {
        ids.iter().map(|id| Person::new(id, id)).collect()
    }

    #[test]
    fn co_parents_become_couple_root() {
        let dataset = Dataset {
            people: people(&["A", "B", "C"]),
            relationships: vec![
                RelationshipRecord::parent_child("A", "C"),
                RelationshipRecord::parent_child("B", "C"),
            ],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(&dataset);
        let root = hierarchy.root.unwrap();
        assert_eq!(
            root,
            Unit::Couple {
                parent_ids: ("A".to_string(), "B".to_string()),
                children: Some(vec![Unit::Person {
                    person_id: "C".to_string(),
                    children: None,
                }]),
            }
        );
        assert!(hierarchy.couple_keys.contains("A+B"));
    }

    #[test]
    fn spouses_without_children_stay_separate() {
        let dataset = Dataset {
            people: people(&["A", "B"]),
            relationships: vec![RelationshipRecord::spousal("spouse", "A", "B")],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(&dataset);
        let Some(Unit::SuperRoot { children }) = &hierarchy.root else {
            panic!("expected super-root");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(hierarchy.spouse_pairs, vec![SpousePair::new("A", "B")]);
        assert!(hierarchy.couple_keys.is_empty());
    }

    #[test]
    fn empty_dataset_is_empty_hierarchy() {
        let hierarchy = build_hierarchy(&Dataset::default());
        assert!(hierarchy.is_empty());
        assert!(hierarchy.placed_people().is_empty());
    }
}
