//! [`Mutator`], the write-capable facade, and the [`EntityOps`] drop
//! capability it forwards leftovers to.

use alloc::collections::BTreeMap;
use core::error::Error;
use core::fmt;

use crate::{
    Adapter, AdapterMut, ItemKey, ItemOps, MapAdapter, Patch, SlotIx, SnapshotView, SubAdapter,
};

/// Capability to drop an item into the world for a given actor, consumed only
/// by [`Mutator::give_or_drop`].
pub trait EntityOps {
    /// The actor type items are dropped for.
    type Entity;
    /// The item type being dropped.
    type Item;

    /// Drops `item` for `entity` (e.g. spawns it at the actor's position).
    fn drop_item(&self, entity: &mut Self::Entity, item: Self::Item);
}

/// Error from the all-or-nothing operations of [`Mutator`]: the request could
/// not be fully satisfied, so not a single slot was written.
///
/// Carries the failing [`Patch`] so the caller can inspect what would have
/// changed and which parts fell short.
#[derive(Clone, Eq, PartialEq, displaydoc::Display)]
#[displaydoc("inventory operation could not be fully satisfied; no slots were written")]
pub struct Unapplied<A> {
    patch: Patch<A>,
}

impl<A> Unapplied<A> {
    /// The patch that was computed but not committed.
    pub fn patch(&self) -> &Patch<A> {
        &self.patch
    }

    /// Discards the error and returns the uncommitted patch.
    pub fn into_patch(self) -> Patch<A> {
        self.patch
    }
}

impl<A: fmt::Debug> fmt::Debug for Unapplied<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { patch } = self;
        f.debug_struct("Unapplied").field("patch", patch).finish()
    }
}

impl<A: fmt::Debug + fmt::Display> Error for Unapplied<A> {}

/// Applies [`Patch`]es and high-level operations to a mutable
/// [`AdapterMut`]-backed container.
///
/// All heavy logic (space calculation, validation, composition) is delegated
/// to [`SnapshotView`] and [`Patch`]; this type is responsible only for the
/// final writes. It holds no state besides its capabilities, so every
/// operation recomputes from the adapter's current contents.
///
/// [`give`](Self::give), [`take`](Self::take), and
/// [`take_by_key`](Self::take_by_key) are atomic with respect to this mutator:
/// they compute a patch first and write to the underlying container only if
/// the patch is fully successful. Nothing here guards against the backing
/// store changing between the computation and the writes; callers sharing a
/// store with others must serialize around the whole call.
#[derive(Clone, Debug)]
pub struct Mutator<Ad, O, E> {
    inventory: Ad,
    ops: O,
    entity_ops: E,
    empty_key: ItemKey,
}

impl<Ad, O, E> Mutator<Ad, O, E>
where
    Ad: AdapterMut<Item = O::Item>,
    O: ItemOps + Clone,
    E: EntityOps<Item = O::Item>,
{
    /// Construct a mutator over `inventory`.
    ///
    /// The adapter may be owned or a `&mut` borrow of a longer-lived one.
    pub fn new(inventory: Ad, ops: O, entity_ops: E, empty_key: ItemKey) -> Self {
        Self {
            inventory,
            ops,
            entity_ops,
            empty_key,
        }
    }

    /// The underlying adapter.
    pub fn inventory(&self) -> &Ad {
        &self.inventory
    }

    /// Discards the mutator and returns the underlying adapter.
    pub fn into_inventory(self) -> Ad {
        self.inventory
    }

    /// A read-only view over the adapter's current contents.
    pub fn snapshot(&self) -> SnapshotView<&Ad, O> {
        SnapshotView::new(&self.inventory, self.ops.clone(), self.empty_key.clone())
    }

    /// Writes every modified slot of an already-validated patch.
    fn write(&mut self, patch: &Patch<O::Item>) {
        let slot_count = patch.modified().len();
        if slot_count > 0 {
            log::trace!("committing {slot_count} modified slot(s)");
        }
        for (&slot, item) in patch.modified() {
            self.inventory.set(slot, self.ops.copy(item));
        }
    }

    fn commit_if_success(
        &mut self,
        patch: Patch<O::Item>,
    ) -> Result<Patch<O::Item>, Unapplied<O::Item>> {
        if patch.is_success() {
            self.write(&patch);
            Ok(patch)
        } else {
            Err(Unapplied { patch })
        }
    }

    /// Commits a previously computed patch, all or nothing.
    ///
    /// The patch should have been computed against this mutator's current
    /// contents (e.g. the cumulative patch of a successful
    /// [`Transaction`](crate::Transaction) begun from [`snapshot`](Self::snapshot)).
    pub fn commit(&mut self, patch: Patch<O::Item>) -> Result<Patch<O::Item>, Unapplied<O::Item>> {
        self.commit_if_success(patch)
    }

    /// Places the given items, all or nothing.
    ///
    /// On success every affected slot is written and the committed patch is
    /// returned; otherwise the container is untouched and the failing patch
    /// comes back inside the error.
    pub fn give<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a O::Item>,
    ) -> Result<Patch<O::Item>, Unapplied<O::Item>>
    where
        O::Item: 'a,
    {
        let patch = self.snapshot().give_items(items);
        self.commit_if_success(patch)
    }

    /// Withdraws the given items, all or nothing.
    pub fn take<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a O::Item>,
    ) -> Result<Patch<O::Item>, Unapplied<O::Item>>
    where
        O::Item: 'a,
    {
        let patch = self.snapshot().take_items(items);
        self.commit_if_success(patch)
    }

    /// Withdraws up to `count` items of the given key, all or nothing.
    pub fn take_by_key(
        &mut self,
        count: u32,
        key: &ItemKey,
    ) -> Result<Patch<O::Item>, Unapplied<O::Item>> {
        let patch = self.snapshot().take_by_key(count, key);
        self.commit_if_success(patch)
    }

    /// Places `item`, committing whatever fits (partial success allowed), and
    /// forwards every leftover to `entity`'s drop capability.
    ///
    /// Returns the patch describing what was written and what was dropped.
    pub fn give_or_drop(&mut self, entity: &mut E::Entity, item: &O::Item) -> Patch<O::Item> {
        let patch = self.snapshot().give_items([item]);
        self.write(&patch);
        let leftover_count = patch.failure().leftover().len();
        if leftover_count > 0 {
            log::trace!("forwarding {leftover_count} leftover stack(s) to entity drop");
        }
        for leftover in patch.failure().leftover() {
            self.entity_ops.drop_item(entity, self.ops.copy(leftover));
        }
        patch
    }

    /// A mutator over an independent in-memory duplicate of the current
    /// contents, useful for speculative multi-step composition before deciding
    /// whether to commit against the real container.
    pub fn detached(&self) -> Mutator<MapAdapter<O::Item>, O, E>
    where
        E: Clone,
    {
        let map: BTreeMap<_, _> = self
            .inventory
            .entries()
            .map(|(slot, item)| (slot, self.ops.copy(item)))
            .collect();
        Mutator {
            inventory: MapAdapter::new(map, self.ops.empty()),
            ops: self.ops.clone(),
            entity_ops: self.entity_ops.clone(),
            empty_key: self.empty_key.clone(),
        }
    }

    /// A mutator scoped to the given slots (see [`SubAdapter`]): reads outside
    /// them yield the empty sentinel and writes outside them are dropped.
    pub fn sub_inventory(
        self,
        slots: impl IntoIterator<Item = SlotIx>,
    ) -> Mutator<SubAdapter<Ad>, O, E> {
        let empty = self.ops.empty();
        Mutator {
            inventory: SubAdapter::new(self.inventory, empty, slots),
            ops: self.ops,
            entity_ops: self.entity_ops,
            empty_key: self.empty_key,
        }
    }
}
