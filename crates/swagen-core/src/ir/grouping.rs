use std::collections::BTreeMap;

use super::operations::IrOperation;
use super::types::IrTagGroup;
use crate::transform::name_normalizer::normalize_name;

/// Group operations by tag. Groups are sorted by tag name; each holds the
/// indices of its operations, unique and in the order of `operations`.
/// Untagged operations belong to no group.
pub fn group_by_tag(operations: &[IrOperation]) -> Vec<IrTagGroup> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for (i, op) in operations.iter().enumerate() {
        for tag in &op.tags {
            let members = groups.entry(tag.as_str()).or_default();
            if !members.contains(&i) {
                members.push(i);
            }
        }
    }

    groups
        .into_iter()
        .map(|(tag, operations)| IrTagGroup {
            name: normalize_name(tag),
            operations,
        })
        .collect()
}
