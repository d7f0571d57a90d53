//! Ownership facet: who owns each property.

use std::collections::BTreeMap;

use gamefeed_types::{BoardPosition, ChangeEvent, OwnerChange, OwnershipSnapshot};

use super::FacetDiff;

/// Report every property whose owner differs between the two mappings,
/// aggregated into one `propertyOwnerChanges` event.
///
/// A position missing from either side resolves to unowned, so a property
/// appearing with an owner reports `oldOwner: null` and one disappearing
/// reports `newOwner: null`.
pub fn diff_ownership(
    previous: &OwnershipSnapshot,
    current: &OwnershipSnapshot,
) -> FacetDiff<OwnershipSnapshot> {
    let changes: BTreeMap<BoardPosition, OwnerChange> = previous
        .keys()
        .chain(current.keys())
        .filter_map(|&position| {
            let old_owner = previous.get(&position).copied().flatten();
            let new_owner = current.get(&position).copied().flatten();
            (old_owner != new_owner).then_some((
                position,
                OwnerChange {
                    new_owner,
                    old_owner,
                },
            ))
        })
        .collect();

    if changes.is_empty() {
        FacetDiff::quiet(current.clone())
    } else {
        FacetDiff::single(ChangeEvent::PropertyOwnerChanges(changes), current.clone())
    }
}
