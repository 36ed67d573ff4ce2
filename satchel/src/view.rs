//! [`SnapshotView`], the read-only computation surface over an [`Adapter`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{Adapter, GiveResult, ItemKey, ItemOps, MapAdapter, Patch, SlotIx, SubAdapter, TakeResult};

/// A [`SnapshotView`] backed by its own private, normalized slot map,
/// disconnected from any live container.
pub type FrozenView<O> = SnapshotView<MapAdapter<<O as ItemOps>::Item>, O>;

/// Read-only view over an [`Adapter`] that computes derived inventory
/// operations without side effects.
///
/// Methods such as [`give_items`](Self::give_items) and
/// [`take_items`](Self::take_items) return [`Patch`]es describing the changes
/// that *would* be applied, but perform no mutation themselves. Committing a
/// patch is the job of [`Mutator`](crate::Mutator).
///
/// **Important:** a view does not own a deep copy of the container contents;
/// every read goes through the adapter, so external modification of the
/// backing store is observed by later reads. When a frozen basis is required,
/// use [`to_immutable`](Self::to_immutable) first.
#[derive(Clone, Debug)]
pub struct SnapshotView<Ad, O> {
    inventory: Ad,
    ops: O,
    empty_key: ItemKey,
}

impl<O: ItemOps> SnapshotView<MapAdapter<O::Item>, O> {
    /// A view over no slots at all.
    pub fn empty(ops: O, empty_key: ItemKey) -> FrozenView<O> {
        let empty_item = ops.empty();
        SnapshotView::new(MapAdapter::new(BTreeMap::new(), empty_item), ops, empty_key)
    }
}

impl<Ad, O> SnapshotView<Ad, O>
where
    Ad: Adapter<Item = O::Item>,
    O: ItemOps,
{
    /// Construct a view over `inventory`, interpreting items through `ops`.
    ///
    /// `empty_key` is the host's designated "no item" key; requests for it are
    /// treated as no-ops by the key-based operations.
    pub fn new(inventory: Ad, ops: O, empty_key: ItemKey) -> Self {
        Self {
            inventory,
            ops,
            empty_key,
        }
    }

    /// The underlying adapter.
    pub fn inventory(&self) -> &Ad {
        &self.inventory
    }

    /// The item capability in use.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// The host's designated "no item" key.
    pub fn empty_key(&self) -> &ItemKey {
        &self.empty_key
    }

    /// The contents of `slot`, or the empty sentinel.
    pub fn get(&self, slot: SlotIx) -> &O::Item {
        self.inventory.get(slot)
    }

    /// Every (slot, item) pair, in adapter order.
    pub fn entries(&self) -> impl Iterator<Item = (SlotIx, &O::Item)> {
        self.inventory.entries()
    }

    fn normalized_copy(&self, item: &O::Item) -> O::Item {
        if self.ops.is_empty(item) {
            self.ops.empty()
        } else {
            self.ops.copy(item)
        }
    }

    /// A view backed by a private, normalized, disconnected copy of the
    /// current contents.
    ///
    /// Use this when the underlying store may be mutated concurrently and a
    /// frozen basis is required. Empty-like values collapse to the canonical
    /// sentinel, so applying `to_immutable` twice yields the same contents as
    /// applying it once.
    pub fn to_immutable(&self) -> FrozenView<O>
    where
        O: Clone,
    {
        let map: BTreeMap<SlotIx, O::Item> = self
            .entries()
            .map(|(slot, item)| (slot, self.normalized_copy(item)))
            .collect();
        SnapshotView::new(
            MapAdapter::new(map, self.ops.empty()),
            self.ops.clone(),
            self.empty_key.clone(),
        )
    }

    /// A frozen view equal to the current contents with `modified` overlaid
    /// (values in `modified` win). The original adapter is not touched.
    ///
    /// [`Transaction`](crate::Transaction) uses this to fold a successful
    /// patch forward.
    pub fn updated(&self, modified: &BTreeMap<SlotIx, O::Item>) -> FrozenView<O>
    where
        O: Clone,
    {
        let mut map: BTreeMap<SlotIx, O::Item> = self
            .entries()
            .map(|(slot, item)| (slot, self.normalized_copy(item)))
            .collect();
        for (&slot, item) in modified {
            map.insert(slot, self.normalized_copy(item));
        }
        SnapshotView::new(
            MapAdapter::new(map, self.ops.empty()),
            self.ops.clone(),
            self.empty_key.clone(),
        )
    }

    /// A view restricted to the given slots, in the given order
    /// (see [`SubAdapter`]).
    pub fn sub_inventory(
        self,
        slots: impl IntoIterator<Item = SlotIx>,
    ) -> SnapshotView<SubAdapter<Ad>, O> {
        let empty = self.ops.empty();
        SnapshotView {
            inventory: SubAdapter::new(self.inventory, empty, slots),
            ops: self.ops,
            empty_key: self.empty_key,
        }
    }

    /// Computes how much of `item` could be inserted into each slot without
    /// modifying anything.
    ///
    /// Returns a slot-to-insertable-amount mapping; see
    /// [`find_spaces_matching`](Self::find_spaces_matching) for the scan
    /// rules.
    pub fn find_spaces(&self, item: &O::Item) -> BTreeMap<SlotIx, u32> {
        if self.ops.is_empty(item) {
            return BTreeMap::new();
        }
        self.find_spaces_matching(
            self.ops.amount(item),
            self.ops.max_stack_size(item),
            |occupant| self.ops.is_similar(occupant, item),
        )
    }

    /// Computes per-slot space for up to `amount` items of the given key,
    /// using [`ItemOps::create`] to determine the stack capacity.
    ///
    /// A key unknown to the capability has no capacity, so the result is
    /// empty.
    pub fn find_spaces_by_key(&self, key: &ItemKey, amount: u32) -> BTreeMap<SlotIx, u32> {
        let max_stack = self
            .ops
            .create(key)
            .map_or(0, |item| self.ops.max_stack_size(&item));
        self.find_spaces_matching(amount, max_stack, |occupant| {
            self.ops.key_of(occupant) == *key
        })
    }

    /// Low-level allocation scan: distributes up to `amount` over the slots in
    /// adapter order, stacking onto occupied slots matching `predicate` and
    /// filling empty slots up to `max_stack`.
    ///
    /// Slots with no room are recorded with no entry rather than a zero, and
    /// the scan stops as soon as the amount is exhausted; slots past that
    /// point are never visited. A request with `amount == 0` or
    /// `max_stack == 0` yields an empty mapping without scanning.
    pub fn find_spaces_matching(
        &self,
        amount: u32,
        max_stack: u32,
        predicate: impl Fn(&O::Item) -> bool,
    ) -> BTreeMap<SlotIx, u32> {
        let mut found = BTreeMap::new();
        if amount == 0 || max_stack == 0 {
            return found;
        }
        let mut remaining = amount;
        for (slot, item) in self.inventory.entries() {
            if remaining == 0 {
                break;
            }
            if self.ops.is_empty(item) {
                let space = max_stack.min(remaining);
                found.insert(slot, space);
                remaining -= space;
            } else if predicate(item) {
                let space = max_stack
                    .saturating_sub(self.ops.amount(item))
                    .min(remaining);
                if space >= 1 {
                    found.insert(slot, space);
                    remaining -= space;
                }
            }
        }
        found
    }

    /// Finds how many items similar to `item` can be taken from each slot, up
    /// to `item`'s own amount in total.
    pub fn find_slots(&self, item: &O::Item) -> BTreeMap<SlotIx, u32> {
        self.find_slots_matching(self.ops.amount(item), |occupant| {
            self.ops.is_similar(occupant, item)
        })
    }

    /// Finds slots contributing up to `count` items of the given key.
    pub fn find_slots_by_key(&self, key: &ItemKey, count: u32) -> BTreeMap<SlotIx, u32> {
        self.find_slots_matching(count, |occupant| self.ops.key_of(occupant) == *key)
    }

    /// Low-level reclamation scan: accumulates up to `count` from the slots in
    /// adapter order whose contents match `predicate`.
    ///
    /// A matching slot holding a zero amount contributes nothing and is
    /// skipped. The scan stops as soon as the count is exhausted.
    pub fn find_slots_matching(
        &self,
        count: u32,
        predicate: impl Fn(&O::Item) -> bool,
    ) -> BTreeMap<SlotIx, u32> {
        let mut found = BTreeMap::new();
        if count == 0 {
            return found;
        }
        let mut remaining = count;
        for (slot, item) in self.inventory.entries() {
            if remaining == 0 {
                break;
            }
            if predicate(item) {
                let taken = remaining.min(self.ops.amount(item));
                if taken >= 1 {
                    found.insert(slot, taken);
                    remaining -= taken;
                }
            }
        }
        found
    }

    /// Computes the placement of one stack, yielding the raw [`GiveResult`].
    ///
    /// If nothing at all could be placed, the result is entirely empty, with
    /// no leftover recorded; "no compatible slot" is indistinguishable here
    /// from "nothing requested". The patch-level
    /// [`give_items`](Self::give_items) preserves this behavior.
    pub fn give_one(&self, item: &O::Item) -> GiveResult<O::Item> {
        let spaces = self.find_spaces(item);
        if spaces.is_empty() {
            return GiveResult::default();
        }
        let mut modified = BTreeMap::new();
        let mut diff = Vec::new();
        let mut leftover_amount = self.ops.amount(item);
        for (&slot, &space) in &spaces {
            let current = self.inventory.get(slot);
            let existing = if self.ops.is_empty(current) {
                0
            } else {
                self.ops.amount(current)
            };
            // The slot's new value is a copy of the request at the combined
            // amount, not a delta; the delta goes in the log.
            modified.insert(slot, self.ops.with_amount(item, existing + space));
            diff.push((slot, self.ops.with_amount(item, space)));
            leftover_amount -= space;
        }
        let leftover = (leftover_amount >= 1).then(|| self.ops.with_amount(item, leftover_amount));
        GiveResult {
            modified,
            diff,
            leftover,
        }
    }

    /// Computes the withdrawal of up to `count` items matching `predicate`,
    /// yielding the raw [`TakeResult`].
    ///
    /// Slots drained to zero get the empty sentinel as their new value.
    pub fn take_one(
        &self,
        count: u32,
        predicate: impl Fn(&O::Item) -> bool,
    ) -> TakeResult<O::Item> {
        let slots = self.find_slots_matching(count, predicate);
        let mut modified = BTreeMap::new();
        let mut diff = Vec::new();
        let mut remaining = count;
        for (&slot, &taken) in &slots {
            let current = self.inventory.get(slot);
            let new_amount = self.ops.amount(current).saturating_sub(taken);
            let new_item = if new_amount == 0 {
                self.ops.empty()
            } else {
                self.ops.with_amount(current, new_amount)
            };
            modified.insert(slot, new_item);
            diff.push((slot, self.ops.with_amount(current, taken)));
            remaining -= taken;
        }
        TakeResult {
            modified,
            diff,
            remaining,
        }
    }

    /// For each item in sequence, computes its placement and combines the
    /// per-item patches left to right with [`Patch::plus`].
    ///
    /// Any amount that found no space is recorded as a leftover item in the
    /// patch's failure.
    pub fn give_items<'a>(&self, items: impl IntoIterator<Item = &'a O::Item>) -> Patch<O::Item>
    where
        O::Item: 'a,
    {
        let mut patch = Patch::default();
        for item in items {
            let GiveResult {
                modified,
                diff,
                leftover,
            } = self.give_one(item);
            patch = patch.plus(Patch::from_give(modified, diff, leftover));
        }
        patch
    }

    /// For each non-empty item in sequence, computes the withdrawal of its
    /// amount in similar items and combines the per-item patches left to
    /// right.
    ///
    /// Any count that could not be taken is recorded as a shortfall item in
    /// the patch's failure. Empty items contribute nothing.
    pub fn take_items<'a>(&self, items: impl IntoIterator<Item = &'a O::Item>) -> Patch<O::Item>
    where
        O::Item: 'a,
    {
        let mut patch = Patch::default();
        for item in items {
            if self.ops.is_empty(item) {
                continue;
            }
            let step = self.take_matching(self.ops.amount(item), item, |occupant| {
                self.ops.is_similar(occupant, item)
            });
            patch = patch.plus(step);
        }
        patch
    }

    /// Computes the withdrawal of up to `count` items matching `predicate`.
    ///
    /// `base` is the item the shortfall is synthesized from when the request
    /// cannot be fully satisfied (a copy at the unmet amount).
    pub fn take_matching(
        &self,
        count: u32,
        base: &O::Item,
        predicate: impl Fn(&O::Item) -> bool,
    ) -> Patch<O::Item> {
        let TakeResult {
            modified,
            diff,
            remaining,
        } = self.take_one(count, predicate);
        let shortfall = (remaining >= 1).then(|| self.ops.with_amount(base, remaining));
        Patch::from_take(modified, diff, shortfall)
    }

    /// Computes the withdrawal of up to `count` items of the given key.
    ///
    /// Requesting the designated empty key is a no-op yielding the canonical
    /// empty patch, as is a key unknown to [`ItemOps::create`] (there is no
    /// value to synthesize a shortfall from).
    pub fn take_by_key(&self, count: u32, key: &ItemKey) -> Patch<O::Item> {
        if *key == self.empty_key {
            return Patch::default();
        }
        match self.ops.create(key) {
            Some(base) => {
                self.take_matching(count, &base, |occupant| self.ops.key_of(occupant) == *key)
            }
            None => Patch::default(),
        }
    }

    /// Whether at least `item`'s amount in similar items is present.
    pub fn has_items(&self, item: &O::Item) -> bool {
        let available: u64 = self
            .find_slots(item)
            .values()
            .map(|&taken| u64::from(taken))
            .sum();
        u64::from(self.ops.amount(item)) <= available
    }

    /// The total amount of items of the given key.
    pub fn count_items(&self, key: &ItemKey) -> u32 {
        self.find_slots_by_key(key, u32::MAX).values().sum()
    }
}
