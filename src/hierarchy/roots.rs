use std::collections::HashSet;

use crate::model::Dataset;

use super::builder::BuildContext;
use super::types::Unit;

/// Builds the top of the tree: couple roots first, then single roots, and a
/// synthetic super-root when more than one family remains.
pub fn assemble_root<'a>(dataset: &'a Dataset, ctx: &mut BuildContext<'_, 'a>) -> Option<Unit> {
    let candidates: Vec<&'a str> = dataset
        .people
        .iter()
        .map(|person| person.id.as_str())
        .filter(|id| !ctx.index().has_recorded_parent(id))
        .collect();

    if candidates.is_empty() {
        let first = dataset.people.first()?;
        tracing::debug!(person = %first.id, "no parentless people, rooting at first person");
        return ctx.build_unit_for(first.id.as_str());
    }

    let candidate_set: HashSet<&str> = candidates.iter().copied().collect();
    let mut roots = Vec::new();

    for &id in &candidates {
        if ctx.is_placed(id) {
            continue;
        }
        let Some(partner) = ctx.index().co_parent(id) else {
            continue;
        };
        if candidate_set.contains(partner)
            && !ctx.is_placed(partner)
            && let Some(unit) = ctx.build_unit_for(id)
        {
            roots.push(unit);
        }
    }

    for &id in &candidates {
        if ctx.is_placed(id) {
            continue;
        }
        if let Some(unit) = ctx.build_unit_for(id) {
            roots.push(unit);
        }
    }

    match roots.len() {
        0 => None,
        1 => roots.pop(),
        count => {
            tracing::debug!(families = count, "wrapping top-level units in a super-root");
            Some(Unit::SuperRoot { children: roots })
        }
    }
}
