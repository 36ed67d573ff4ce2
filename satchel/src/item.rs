//! The [`ItemOps`] capability for interpreting opaque item values, and
//! key-level aggregation helpers.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::vec::Vec;
use core::fmt;

use arcstr::ArcStr;

/// Identity of a kind of item, as used for aggregation and key-based queries.
///
/// A key is a pair of an identity id (such as `"base:apple"`) and a
/// display discriminator (such as a custom display name). Two items with the
/// same key count as the same kind for [`totals_by_key`], [`collapse_stacks`],
/// and the `*_by_key` queries on [`SnapshotView`](crate::SnapshotView).
///
/// Which key denotes "empty" is a property of the host item system, not of
/// this crate; it is supplied to every [`SnapshotView`](crate::SnapshotView)
/// and [`Mutator`](crate::Mutator) constructor.
///
/// Keys are immutable and cheap to clone.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ItemKey {
    id: ArcStr,
    name: ArcStr,
}

impl ItemKey {
    /// Construct a key from an identity id and a display discriminator.
    ///
    /// Use `""` for the discriminator when the host item system does not
    /// distinguish display variants.
    pub fn new(id: impl Into<ArcStr>, name: impl Into<ArcStr>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The identity id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display discriminator; `""` if none.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { id, name } = self;
        if name.is_empty() {
            write!(f, "{id}")
        } else {
            write!(f, "{id} ({name})")
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for ItemKey {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::new(u.arbitrary::<&str>()?, u.arbitrary::<&str>()?))
    }
}

/// Capability for interpreting an opaque item type `Self::Item`.
///
/// Every algorithm in this crate touches item values only through a value of a
/// type implementing `ItemOps`; there is no trait bound on the item type
/// itself, not even [`Clone`]. Capability values are expected to be cheap to
/// clone (usually zero-sized) and are passed explicitly into every
/// constructor.
///
/// # Requirements on implementations
///
/// * An item for which [`is_empty`](Self::is_empty) holds must be treated as
///   interchangeable with [`empty()`](Self::empty); snapshots normalize such
///   values to the canonical sentinel at construction and update boundaries.
/// * [`copy`](Self::copy) and [`with_amount`](Self::with_amount) must return
///   values with no aliasing back to their input, so that a computed
///   [`Patch`](crate::Patch) can never be corrupted by later mutation of the
///   source container.
/// * [`is_similar`](Self::is_similar) must be reflexive and symmetric. It need
///   not agree with [`key_of`](Self::key_of) equality; callers wanting strict
///   key equality use the `*_by_key` queries instead.
pub trait ItemOps {
    /// The item type this capability interprets.
    type Item;

    /// Whether `item` represents "no item".
    fn is_empty(&self, item: &Self::Item) -> bool;

    /// The identity key of `item`.
    fn key_of(&self, item: &Self::Item) -> ItemKey;

    /// The stack count of `item`.
    fn amount(&self, item: &Self::Item) -> u32;

    /// An independent copy of `item` with its amount replaced by `amount`.
    fn with_amount(&self, item: &Self::Item, amount: u32) -> Self::Item;

    /// The largest amount one slot may hold of items like `item`.
    fn max_stack_size(&self, item: &Self::Item) -> u32;

    /// An independent copy of `item`.
    fn copy(&self, item: &Self::Item) -> Self::Item;

    /// Construct a unit item for `key`, or [`None`] if the key is unknown to
    /// this capability.
    fn create(&self, key: &ItemKey) -> Option<Self::Item>;

    /// The canonical empty sentinel value.
    fn empty(&self) -> Self::Item;

    /// Whether `a` and `b` may share a stack.
    fn is_similar(&self, a: &Self::Item, b: &Self::Item) -> bool;
}

/// Merges same-key stacks across a collection into one stack per key.
///
/// Empty stacks are ignored. The result is ordered by key and the amounts sum
/// saturating at [`u32::MAX`]. Stacks are *not* split to honor
/// [`ItemOps::max_stack_size`]; this is aggregation, not allocation.
pub fn collapse_stacks<'a, O: ItemOps>(
    ops: &O,
    items: impl IntoIterator<Item = &'a O::Item>,
) -> Vec<O::Item>
where
    O::Item: 'a,
{
    let mut merged: BTreeMap<ItemKey, O::Item> = BTreeMap::new();
    for item in items {
        if ops.is_empty(item) {
            continue;
        }
        match merged.entry(ops.key_of(item)) {
            Entry::Occupied(mut entry) => {
                let total = ops.amount(entry.get()).saturating_add(ops.amount(item));
                let combined = ops.with_amount(entry.get(), total);
                entry.insert(combined);
            }
            Entry::Vacant(entry) => {
                entry.insert(ops.copy(item));
            }
        }
    }
    merged.into_values().collect()
}

/// Sums stack amounts per key across a collection.
///
/// Empty stacks are ignored.
pub fn totals_by_key<'a, O: ItemOps>(
    ops: &O,
    items: impl IntoIterator<Item = &'a O::Item>,
) -> BTreeMap<ItemKey, u64>
where
    O::Item: 'a,
{
    let mut totals: BTreeMap<ItemKey, u64> = BTreeMap::new();
    for item in items {
        if ops.is_empty(item) {
            continue;
        }
        *totals.entry(ops.key_of(item)).or_insert(0) += u64::from(ops.amount(item));
    }
    totals
}

/// Moves as much of `addition` onto `target` as stacking rules allow.
///
/// Returns the new value for `target` and the leftover part of `addition`, if
/// any. Nothing moves when the two stacks are dissimilar or `target` is
/// already at capacity; the inputs are never modified.
pub fn stack_onto<O: ItemOps>(
    ops: &O,
    target: &O::Item,
    addition: &O::Item,
) -> (O::Item, Option<O::Item>) {
    if ops.is_empty(addition) {
        return (ops.copy(target), None);
    }
    let capacity = ops.max_stack_size(addition);
    if ops.is_empty(target) {
        let moved = ops.amount(addition).min(capacity);
        if moved == 0 {
            return (ops.copy(target), Some(ops.copy(addition)));
        }
        let rest = ops.amount(addition) - moved;
        let leftover = (rest >= 1).then(|| ops.with_amount(addition, rest));
        return (ops.with_amount(addition, moved), leftover);
    }
    if !ops.is_similar(target, addition) {
        return (ops.copy(target), Some(ops.copy(addition)));
    }
    let space = capacity.saturating_sub(ops.amount(target));
    let moved = space.min(ops.amount(addition));
    if moved == 0 {
        return (ops.copy(target), Some(ops.copy(addition)));
    }
    let combined = ops.with_amount(target, ops.amount(target) + moved);
    let rest = ops.amount(addition) - moved;
    let leftover = (rest >= 1).then(|| ops.with_amount(addition, rest));
    (combined, leftover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestOps, stack};
    use itertools::Itertools as _;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_accessors_and_display() {
        let plain = ItemKey::new("oak_log", "");
        assert_eq!(plain.id(), "oak_log");
        assert_eq!(plain.name(), "");
        assert_eq!(format!("{plain}"), "oak_log");
        assert_eq!(
            format!("{}", ItemKey::new("oak_log", "Firewood")),
            "oak_log (Firewood)"
        );
    }

    #[test]
    fn collapse_merges_by_key_and_skips_empty() {
        let ops = TestOps;
        let items = [
            stack("apple", 3),
            stack("dirt", 5),
            stack("apple", 4),
            ops.empty(),
        ];
        let collapsed = collapse_stacks(&ops, &items);
        assert_eq!(collapsed, vec![stack("apple", 7), stack("dirt", 5)]);
    }

    #[test]
    fn totals_sum_per_key() {
        let ops = TestOps;
        let items = [stack("apple", 3), stack("dirt", 5), stack("apple", 4)];
        let totals = totals_by_key(&ops, &items);
        assert_eq!(
            totals.into_iter().collect::<Vec<_>>(),
            vec![
                (ItemKey::new("apple", ""), 7),
                (ItemKey::new("dirt", ""), 5),
            ]
        );
    }

    #[test]
    fn stack_onto_fills_up_to_capacity() {
        let ops = TestOps;
        let (target, leftover) = stack_onto(&ops, &stack("apple", 60), &stack("apple", 10));
        assert_eq!(target, stack("apple", 64));
        assert_eq!(leftover, Some(stack("apple", 6)));
    }

    #[test]
    fn stack_onto_empty_target_takes_whole_stack() {
        let ops = TestOps;
        let (target, leftover) = stack_onto(&ops, &ops.empty(), &stack("apple", 10));
        assert_eq!(target, stack("apple", 10));
        assert_eq!(leftover, None);
    }

    #[test]
    fn stack_onto_dissimilar_moves_nothing() {
        let ops = TestOps;
        let (target, leftover) = stack_onto(&ops, &stack("dirt", 1), &stack("apple", 10));
        assert_eq!(target, stack("dirt", 1));
        assert_eq!(leftover, Some(stack("apple", 10)));
    }

    /// Whatever the combination of counts and identities, `stack_onto` must
    /// conserve the total amount and leave dissimilar stacks untouched.
    #[test]
    fn stack_onto_systematic() {
        let ops = TestOps;
        let gen_stacks = || {
            [0u32, 1, 2, 10, 63, 64, 65, 200]
                .into_iter()
                .cartesian_product(["apple", "dirt"])
                .map(|(amount, id)| stack(id, amount))
        };
        for source in gen_stacks() {
            for addition in gen_stacks() {
                let (combined, leftover) = stack_onto(&ops, &source, &addition);
                let total_in = u64::from(source.amount) + u64::from(addition.amount);
                let total_out = u64::from(combined.amount)
                    + leftover.as_ref().map_or(0, |item| u64::from(item.amount));
                assert_eq!(total_in, total_out, "not conservative: {source:?} {addition:?}");
                let different = source.id != addition.id
                    && !ops.is_empty(&source)
                    && !ops.is_empty(&addition);
                if different {
                    assert_eq!(combined, source, "combined dissimilar stacks");
                    assert_eq!(leftover, Some(addition.clone()));
                }
            }
        }
    }
}
