//! Metadata hoisting
//!
//! Moves named statements (capability imports, contract metadata, hooks) to the top of the
//! file in a fixed order. Everything else keeps its relative position after them.

use super::output::{OutputItem, OutputProgram, ProgramView};
use crate::shared::models::ModuleId;
use std::collections::HashMap;
use tracing::debug;

/// Stable-sort `program` by position of each statement's name in `order`.
///
/// A literal assignment directly followed by a bare string moves as one unit. When the order
/// changes, the header of `root` is repeated at the top and headers left dangling at the
/// end are removed. Returns whether anything moved.
pub fn hoist_metadata(
    program: &mut OutputProgram,
    view: &ProgramView<'_>,
    order: &[String],
    root: ModuleId,
) -> bool {
    let rank: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let unknown = order.len();

    let groups = group_multiline_literals(program.items(), view);
    let mut ranked: Vec<(usize, Vec<OutputItem>)> = groups
        .into_iter()
        .map(|group| {
            let key = view
                .name(&group[0])
                .and_then(|name| rank.get(name.as_str()).copied())
                .unwrap_or(unknown);
            (key, group)
        })
        .collect();
    ranked.sort_by_key(|(key, _)| *key);

    let mut items: Vec<OutputItem> = ranked.into_iter().flat_map(|(_, group)| group).collect();
    if items.as_slice() == program.items() {
        return false;
    }

    let root_header: Vec<OutputItem> = program
        .items()
        .iter()
        .filter(|item| matches!(item, OutputItem::Header { module, .. } if *module == root))
        .cloned()
        .collect();
    while items.last().is_some_and(OutputItem::is_header) {
        items.pop();
    }
    let hoisted = root_header.into_iter().chain(items).collect();
    program.replace_items(hoisted);
    debug!(items = program.len(), "hoisted metadata statements");
    true
}

fn group_multiline_literals(items: &[OutputItem], view: &ProgramView<'_>) -> Vec<Vec<OutputItem>> {
    let mut groups = Vec::with_capacity(items.len());
    let mut i = 0;
    while i < items.len() {
        let joins_next = view.is_literal_assignment(&items[i])
            && items
                .get(i + 1)
                .is_some_and(|next| view.is_string_expression(next));
        if joins_next {
            groups.push(vec![items[i].clone(), items[i + 1].clone()]);
            i += 2;
        } else {
            groups.push(vec![items[i].clone()]);
            i += 1;
        }
    }
    groups
}
