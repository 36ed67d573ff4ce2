//! End-to-end exercises of the public surface: a small host item model wired
//! through adapters, views, transactions, and a mutator.

use satchel::{
    EntityOps, ItemKey, ItemOps, ListAdapter, Mutator, SnapshotView, Transaction, collapse_stacks,
    totals_by_key,
};

/// Host item model: id, count, and a per-id capacity table.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Ware {
    id: &'static str,
    amount: u32,
}

fn ware(id: &'static str, amount: u32) -> Ware {
    Ware { id, amount }
}

#[derive(Clone, Copy, Debug)]
struct WareOps;

impl WareOps {
    const EMPTY_ID: &'static str = "nothing";
}

impl ItemOps for WareOps {
    type Item = Ware;

    fn is_empty(&self, item: &Ware) -> bool {
        item.id == Self::EMPTY_ID || item.amount == 0
    }

    fn key_of(&self, item: &Ware) -> ItemKey {
        ItemKey::new(item.id, "")
    }

    fn amount(&self, item: &Ware) -> u32 {
        item.amount
    }

    fn with_amount(&self, item: &Ware, amount: u32) -> Ware {
        Ware { amount, ..*item }
    }

    fn max_stack_size(&self, item: &Ware) -> u32 {
        match item.id {
            "anvil" => 1,
            _ => 16,
        }
    }

    fn copy(&self, item: &Ware) -> Ware {
        item.clone()
    }

    fn create(&self, key: &ItemKey) -> Option<Ware> {
        match key.id() {
            "anvil" => Some(ware("anvil", 1)),
            "plank" => Some(ware("plank", 1)),
            "nail" => Some(ware("nail", 1)),
            _ => None,
        }
    }

    fn empty(&self) -> Ware {
        ware(Self::EMPTY_ID, 0)
    }

    fn is_similar(&self, a: &Ware, b: &Ware) -> bool {
        a.id == b.id
    }
}

#[derive(Clone, Copy, Debug)]
struct Floor;

impl EntityOps for Floor {
    type Entity = Vec<Ware>;
    type Item = Ware;

    fn drop_item(&self, entity: &mut Vec<Ware>, item: Ware) {
        entity.push(item);
    }
}

fn empty_key() -> ItemKey {
    ItemKey::new(WareOps::EMPTY_ID, "")
}

fn workshop() -> ListAdapter<Ware> {
    ListAdapter::new(
        vec![
            ware("plank", 12),
            ware("nail", 16),
            WareOps.empty(),
            ware("anvil", 1),
        ],
        WareOps.empty(),
    )
}

#[test]
fn crafting_transaction_consumes_inputs_and_stores_outputs() {
    let mut slots = workshop();
    let mut bench = Mutator::new(&mut slots, WareOps, Floor, empty_key());

    // Craft a crate: 4 planks and 8 nails in, 1 crate out.
    let txn = Transaction::begin(&bench.snapshot())
        .updated(|view| view.take_items([&ware("plank", 4), &ware("nail", 8)]))
        .updated(|view| view.give_items([&ware("crate", 1)]));
    assert!(txn.is_success());
    let (_, patch) = txn.into_parts();
    bench.commit(patch).unwrap();

    assert_eq!(
        slots.into_items(),
        vec![
            ware("plank", 8),
            ware("nail", 8),
            ware("crate", 1),
            ware("anvil", 1),
        ]
    );
}

#[test]
fn failed_transaction_commits_nothing() {
    let mut slots = workshop();
    let mut bench = Mutator::new(&mut slots, WareOps, Floor, empty_key());

    let txn = Transaction::begin(&bench.snapshot())
        .updated(|view| view.take_items([&ware("plank", 4)]))
        .updated(|view| view.take_items([&ware("nail", 99)]));
    assert!(!txn.is_success());
    assert_eq!(txn.patch().failure().shortfall(), &[ware("nail", 83)]);

    let (_, patch) = txn.into_parts();
    assert!(bench.commit(patch).is_err());
    assert_eq!(slots.into_items(), workshop().into_items());
}

#[test]
fn mutator_give_respects_per_item_capacity() {
    let mut slots = workshop();
    let mut bench = Mutator::new(&mut slots, WareOps, Floor, empty_key());

    // Anvils do not stack, so a second one occupies the empty slot.
    bench.give([&ware("anvil", 1)]).unwrap();
    // Planks stack up to 16: 4 onto slot 0, and nothing else fits.
    let err = bench.give([&ware("plank", 5)]).unwrap_err();
    assert_eq!(err.patch().failure().leftover(), &[ware("plank", 1)]);

    assert_eq!(
        slots.into_items(),
        vec![
            ware("plank", 12),
            ware("nail", 16),
            ware("anvil", 1),
            ware("anvil", 1),
        ]
    );
}

#[test]
fn scoped_mutator_only_sees_its_slots() {
    let mut slots = workshop();
    let bench = Mutator::new(&mut slots, WareOps, Floor, empty_key());
    let mut input_side = bench.sub_inventory([0, 1]);

    // The empty slot 2 is invisible, so only the 4 units of headroom in
    // slot 0 are reachable and the rest of the request is leftover.
    let err = input_side.give([&ware("plank", 10)]).unwrap_err();
    assert_eq!(err.patch().failure().leftover(), &[ware("plank", 6)]);
    assert!(input_side.take([&ware("plank", 2)]).is_ok());

    assert_eq!(
        slots.into_items(),
        vec![
            ware("plank", 10),
            ware("nail", 16),
            WareOps.empty(),
            ware("anvil", 1),
        ]
    );
}

#[test]
fn give_or_drop_spills_onto_the_floor() {
    let mut slots = ListAdapter::new(vec![ware("nail", 15)], WareOps.empty());
    let mut bench = Mutator::new(&mut slots, WareOps, Floor, empty_key());

    let mut floor = Vec::new();
    bench.give_or_drop(&mut floor, &ware("nail", 5));

    assert_eq!(slots.into_items(), vec![ware("nail", 16)]);
    assert_eq!(floor, vec![ware("nail", 4)]);
}

#[test]
fn key_queries_and_aggregation_agree() {
    let slots = workshop();
    let view = SnapshotView::new(&slots, WareOps, empty_key());

    assert_eq!(view.count_items(&ItemKey::new("plank", "")), 12);
    assert!(view.has_items(&ware("nail", 16)));
    assert!(!view.has_items(&ware("nail", 17)));

    let items: Vec<Ware> = view
        .entries()
        .map(|(_, item)| item.clone())
        .chain([ware("plank", 3)])
        .collect();
    let totals = totals_by_key(&WareOps, &items);
    assert_eq!(totals[&ItemKey::new("plank", "")], 15);

    let collapsed = collapse_stacks(&WareOps, &items);
    assert_eq!(
        collapsed,
        vec![
            ware("anvil", 1),
            ware("nail", 16),
            ware("plank", 15),
        ]
    );
}
