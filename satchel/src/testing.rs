//! Mock item type and capabilities shared by this crate's unit tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use arcstr::ArcStr;

use crate::{EntityOps, FrozenView, ItemKey, ItemOps, MapAdapter, SlotIx, SnapshotView};

/// The id of the mock empty sentinel.
const VOID: &str = "void";

/// Minimal stackable item for tests: an id, an amount, and a per-item
/// capacity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TestItem {
    pub(crate) id: ArcStr,
    pub(crate) amount: u32,
    pub(crate) max_stack: u32,
}

/// A `TestItem` with the conventional capacity of 64.
pub(crate) fn stack(id: &str, amount: u32) -> TestItem {
    TestItem {
        id: ArcStr::from(id),
        amount,
        max_stack: 64,
    }
}

/// The key the mock host designates as "no item".
pub(crate) fn empty_key() -> ItemKey {
    ItemKey::new(VOID, "")
}

/// Key for a plain id, mirroring `TestOps::key_of`.
pub(crate) fn key(id: &str) -> ItemKey {
    ItemKey::new(id, "")
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TestOps;

impl ItemOps for TestOps {
    type Item = TestItem;

    fn is_empty(&self, item: &TestItem) -> bool {
        item.id == VOID || item.amount == 0
    }

    fn key_of(&self, item: &TestItem) -> ItemKey {
        ItemKey::new(item.id.clone(), "")
    }

    fn amount(&self, item: &TestItem) -> u32 {
        item.amount
    }

    fn with_amount(&self, item: &TestItem, amount: u32) -> TestItem {
        TestItem {
            amount,
            ..item.clone()
        }
    }

    fn max_stack_size(&self, item: &TestItem) -> u32 {
        item.max_stack
    }

    fn copy(&self, item: &TestItem) -> TestItem {
        item.clone()
    }

    fn create(&self, key: &ItemKey) -> Option<TestItem> {
        if key.id().is_empty() || key.id() == VOID {
            return None;
        }
        Some(stack(key.id(), 1))
    }

    fn empty(&self) -> TestItem {
        TestItem {
            id: arcstr::literal!("void"),
            amount: 0,
            max_stack: 64,
        }
    }

    fn is_similar(&self, a: &TestItem, b: &TestItem) -> bool {
        a.id == b.id
    }
}

/// Entity capability that records dropped items on the entity itself.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CollectDrops;

impl EntityOps for CollectDrops {
    type Entity = Vec<TestItem>;
    type Item = TestItem;

    fn drop_item(&self, entity: &mut Vec<TestItem>, item: TestItem) {
        entity.push(item);
    }
}

/// A frozen view over the given slot contents.
pub(crate) fn view_of(slots: &[(SlotIx, TestItem)]) -> FrozenView<TestOps> {
    let map: BTreeMap<SlotIx, TestItem> = slots.iter().cloned().collect();
    SnapshotView::new(MapAdapter::new(map, TestOps.empty()), TestOps, empty_key())
}
