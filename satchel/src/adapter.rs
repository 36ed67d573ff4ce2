//! The [`Adapter`]/[`AdapterMut`] boundary to concrete backing containers, and
//! the provided list, map, and slot-restricting implementations.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

/// Index/address of a container slot.
///
/// This is currently a type alias, but future versions may make it a struct.
pub type SlotIx = usize;

/// Read capability over an indexed, inventory-like structure.
///
/// Implementations may be backed by live game inventories, simple collections,
/// or restricted views ([`SubAdapter`]). No immutability or thread safety is
/// assumed; a [`SnapshotView`](crate::SnapshotView) observes whatever the
/// backing store holds at the moment of each read.
///
/// Slots an adapter does not hold (out of range, absent key, outside a
/// restriction) read as the adapter's empty sentinel value rather than as an
/// error.
pub trait Adapter {
    /// The item type stored in each slot.
    type Item;

    /// Returns the contents of `slot`, or the empty sentinel if the adapter
    /// holds nothing there.
    fn get(&self, slot: SlotIx) -> &Self::Item;

    /// Visits every slot the adapter holds, in the adapter's own order.
    ///
    /// This order is the tie-breaking order for allocation and reclamation
    /// scans, so it must be deterministic for a given adapter state.
    fn entries(&self) -> impl Iterator<Item = (SlotIx, &Self::Item)>;
}

/// Write capability over an indexed, inventory-like structure.
///
/// Within this crate, only [`Mutator`](crate::Mutator) calls [`set`](Self::set),
/// and only with slot values taken from an already-validated
/// [`Patch`](crate::Patch).
pub trait AdapterMut: Adapter {
    /// Stores `item` in `slot`.
    fn set(&mut self, slot: SlotIx, item: Self::Item);
}

impl<T: Adapter + ?Sized> Adapter for &T {
    type Item = T::Item;

    fn get(&self, slot: SlotIx) -> &T::Item {
        (**self).get(slot)
    }

    fn entries(&self) -> impl Iterator<Item = (SlotIx, &T::Item)> {
        (**self).entries()
    }
}

impl<T: Adapter + ?Sized> Adapter for &mut T {
    type Item = T::Item;

    fn get(&self, slot: SlotIx) -> &T::Item {
        (**self).get(slot)
    }

    fn entries(&self) -> impl Iterator<Item = (SlotIx, &T::Item)> {
        (**self).entries()
    }
}

impl<T: AdapterMut + ?Sized> AdapterMut for &mut T {
    fn set(&mut self, slot: SlotIx, item: T::Item) {
        (**self).set(slot, item);
    }
}

/// [`Adapter`] over a [`Vec`], where slot = position.
///
/// Reads beyond the current length yield the empty sentinel; writes beyond it
/// grow the vector, padding the gap with copies of the sentinel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListAdapter<A> {
    items: Vec<A>,
    empty: A,
}

impl<A> ListAdapter<A> {
    /// Construct an adapter over `items`, with `empty` as the sentinel value
    /// reported for out-of-range slots and used as padding.
    pub fn new(items: Vec<A>, empty: A) -> Self {
        Self { items, empty }
    }

    /// The current backing items.
    pub fn items(&self) -> &[A] {
        &self.items
    }

    /// Discards the adapter and returns the backing items.
    pub fn into_items(self) -> Vec<A> {
        self.items
    }
}

impl<A> Adapter for ListAdapter<A> {
    type Item = A;

    fn get(&self, slot: SlotIx) -> &A {
        self.items.get(slot).unwrap_or(&self.empty)
    }

    fn entries(&self) -> impl Iterator<Item = (SlotIx, &A)> {
        self.items.iter().enumerate()
    }
}

impl<A: Clone> AdapterMut for ListAdapter<A> {
    fn set(&mut self, slot: SlotIx, item: A) {
        if slot >= self.items.len() {
            self.items.resize(slot + 1, self.empty.clone());
        }
        self.items[slot] = item;
    }
}

/// [`Adapter`] over a [`BTreeMap`], where slot = key.
///
/// Reads of absent keys yield the empty sentinel; writes insert or overwrite.
/// Iteration order is ascending slot order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MapAdapter<A> {
    items: BTreeMap<SlotIx, A>,
    empty: A,
}

impl<A> MapAdapter<A> {
    /// Construct an adapter over `items`, with `empty` as the sentinel value
    /// reported for absent slots.
    pub fn new(items: BTreeMap<SlotIx, A>, empty: A) -> Self {
        Self { items, empty }
    }

    /// The current backing map.
    pub fn items(&self) -> &BTreeMap<SlotIx, A> {
        &self.items
    }

    /// Discards the adapter and returns the backing map.
    pub fn into_items(self) -> BTreeMap<SlotIx, A> {
        self.items
    }
}

impl<A> Adapter for MapAdapter<A> {
    type Item = A;

    fn get(&self, slot: SlotIx) -> &A {
        self.items.get(&slot).unwrap_or(&self.empty)
    }

    fn entries(&self) -> impl Iterator<Item = (SlotIx, &A)> {
        self.items.iter().map(|(&slot, item)| (slot, item))
    }
}

impl<A> AdapterMut for MapAdapter<A> {
    fn set(&mut self, slot: SlotIx, item: A) {
        self.items.insert(slot, item);
    }
}

/// [`Adapter`] restricting a delegate to a fixed set of visible slots.
///
/// The visible set is deduplicated but keeps its declared order, and that
/// order is the iteration order, so a restriction can also reprioritize which
/// slots an allocation scan reaches first. Reads outside the set yield the
/// empty sentinel and writes outside it are silently dropped, which is what
/// lets the rest of the algebra stay oblivious to the restriction.
pub struct SubAdapter<T: Adapter> {
    delegate: T,
    empty: T::Item,
    slots: Vec<SlotIx>,
    visible: HashSet<SlotIx>,
}

// Manual impls required to set proper associated type bounds.
impl<T: Adapter + Clone> Clone for SubAdapter<T>
where
    T::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
            empty: self.empty.clone(),
            slots: self.slots.clone(),
            visible: self.visible.clone(),
        }
    }
}

impl<T: Adapter + fmt::Debug> fmt::Debug for SubAdapter<T>
where
    T::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            delegate,
            empty,
            slots,
            visible: _,
        } = self;
        f.debug_struct("SubAdapter")
            .field("delegate", delegate)
            .field("empty", empty)
            .field("slots", slots)
            .finish_non_exhaustive()
    }
}

impl<T: Adapter> SubAdapter<T> {
    /// Restrict `delegate` to the given slots, in the given order.
    /// Duplicate slots are dropped, keeping the first occurrence.
    pub fn new(delegate: T, empty: T::Item, slots: impl IntoIterator<Item = SlotIx>) -> Self {
        let mut visible = HashSet::new();
        let mut ordered = Vec::new();
        for slot in slots {
            if visible.insert(slot) {
                ordered.push(slot);
            }
        }
        Self {
            delegate,
            empty,
            slots: ordered,
            visible,
        }
    }

    /// The visible slots, in iteration order.
    pub fn slots(&self) -> &[SlotIx] {
        &self.slots
    }

    /// The adapter being restricted.
    pub fn delegate(&self) -> &T {
        &self.delegate
    }
}

impl<T: Adapter> Adapter for SubAdapter<T> {
    type Item = T::Item;

    fn get(&self, slot: SlotIx) -> &T::Item {
        if self.visible.contains(&slot) {
            self.delegate.get(slot)
        } else {
            &self.empty
        }
    }

    fn entries(&self) -> impl Iterator<Item = (SlotIx, &T::Item)> {
        self.slots.iter().map(|&slot| (slot, self.get(slot)))
    }
}

impl<T: AdapterMut> AdapterMut for SubAdapter<T> {
    fn set(&mut self, slot: SlotIx, item: T::Item) {
        if self.visible.contains(&slot) {
            self.delegate.set(slot, item);
        }
    }
}
