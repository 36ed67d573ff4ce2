//! Satchel is an algebra for slot-indexed containers of stackable items:
//! bounded or unbounded mappings from integer slot to an item value, where each
//! item has an identity, a count, and a per-identity stack capacity.
//!
//! The crate deliberately knows nothing about what an “item” is. All item
//! semantics are supplied through the [`ItemOps`] capability, and all container
//! storage through the [`Adapter`]/[`AdapterMut`] capabilities, so the same
//! algebra serves live game inventories, plain vectors, and plain maps.
//!
//! The parts, from the bottom up:
//!
//! * [`ItemOps`] interprets an opaque item type: emptiness, identity
//!   ([`ItemKey`]), amount, stack capacity, copying, similarity.
//! * [`Adapter`] and [`AdapterMut`] are the read and write boundaries to a
//!   backing store; [`ListAdapter`], [`MapAdapter`], and [`SubAdapter`] are the
//!   provided implementations.
//! * [`SnapshotView`] computes, without mutating anything, exactly how a
//!   request to place or withdraw items would be distributed across slots,
//!   returning a [`Patch`].
//! * [`Patch`] describes the resulting slot contents together with an ordered
//!   change log and a [`Failure`] record of unmet withdrawals (shortfall) and
//!   unplaced remainders (leftover). Patches compose associatively with
//!   [`Patch::plus`].
//! * [`Transaction`] sequences several patch-producing steps against an
//!   evolving private snapshot, short-circuiting on the first failure.
//! * [`Mutator`] is the only writer: it computes a patch against the live
//!   contents and commits it through [`AdapterMut::set`] only if the whole
//!   request succeeded.
//!
//! Reads flow one way (adapter to view to patch); nothing here blocks, spawns,
//! or performs I/O. If the backing store can be mutated concurrently, callers
//! must serialize the compute-then-commit sequence themselves; see
//! [`SnapshotView::to_immutable`] for obtaining a frozen basis.
//!
//! # Example
//!
//! ```
//! use satchel::{Adapter as _, EntityOps, ItemKey, ItemOps, ListAdapter, Mutator};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Stack {
//!     id: &'static str,
//!     amount: u32,
//! }
//!
//! #[derive(Clone, Copy, Debug)]
//! struct StackOps;
//! impl ItemOps for StackOps {
//!     type Item = Stack;
//!     fn is_empty(&self, item: &Stack) -> bool {
//!         item.amount == 0
//!     }
//!     fn key_of(&self, item: &Stack) -> ItemKey {
//!         ItemKey::new(item.id, "")
//!     }
//!     fn amount(&self, item: &Stack) -> u32 {
//!         item.amount
//!     }
//!     fn with_amount(&self, item: &Stack, amount: u32) -> Stack {
//!         Stack { amount, ..item.clone() }
//!     }
//!     fn max_stack_size(&self, _item: &Stack) -> u32 {
//!         64
//!     }
//!     fn copy(&self, item: &Stack) -> Stack {
//!         item.clone()
//!     }
//!     fn create(&self, _key: &ItemKey) -> Option<Stack> {
//!         None
//!     }
//!     fn empty(&self) -> Stack {
//!         Stack { id: "", amount: 0 }
//!     }
//!     fn is_similar(&self, a: &Stack, b: &Stack) -> bool {
//!         a.id == b.id
//!     }
//! }
//!
//! #[derive(Clone, Copy, Debug)]
//! struct NoEntity;
//! impl EntityOps for NoEntity {
//!     type Entity = ();
//!     type Item = Stack;
//!     fn drop_item(&self, _entity: &mut (), _item: Stack) {}
//! }
//!
//! let mut slots = ListAdapter::new(
//!     vec![Stack { id: "apple", amount: 60 }, StackOps.empty()],
//!     StackOps.empty(),
//! );
//! let mut inventory = Mutator::new(&mut slots, StackOps, NoEntity, ItemKey::new("", ""));
//!
//! // 60 of 64 in slot 0, so 4 stack there and 6 land in the empty slot 1.
//! let patch = inventory.give([&Stack { id: "apple", amount: 10 }]).unwrap();
//! assert_eq!(patch.modified().len(), 2);
//! assert_eq!(slots.get(0).amount, 64);
//! assert_eq!(slots.get(1).amount, 6);
//! ```
//!
//! ## Crate features
//!
//! This crate, `satchel`, defines the following feature flags:
//!
//! * `arbitrary`: Adds implementations of the [`arbitrary::Arbitrary`] trait
//!   for fuzzing / property testing on types defined by this crate.
//!
//! ## Dependencies and global state
//!
//! `satchel` has no global state: capability values are passed explicitly into
//! every constructor. It writes log messages using the [`log`] crate and is
//! therefore subject to that global configuration.
#![cfg_attr(
    not(feature = "arbitrary"),
    doc = "[`arbitrary::Arbitrary`]: https://docs.rs/arbitrary/latest/arbitrary/trait.Arbitrary.html"
)]
#![no_std]
// Crate-specific lint settings, beyond the workspace lint table.
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(
    not(any(test, feature = "arbitrary")),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
// Lenience for tests.
#![cfg_attr(test, allow(clippy::redundant_clone))] // prefer regularity over efficiency

#[macro_use]
extern crate alloc;

mod adapter;
pub use adapter::*;

mod item;
pub use item::*;

mod patch;
pub use patch::*;

mod view;
pub use view::*;

mod transaction;
pub use transaction::*;

mod mutator;
pub use mutator::*;

#[cfg(test)]
pub(crate) mod testing;
