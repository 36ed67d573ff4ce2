//! [`Patch`] and the rest of the immutable result algebra: [`Failure`],
//! [`GiveResult`], [`TakeResult`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::SlotIx;

/// A proposed, not-yet-committed set of slot changes plus failure diagnostics.
///
/// A patch consists of:
///
/// * `modified`: the final resulting value per affected slot,
/// * `diff`: an append-only log of per-slot moved amounts in the order the
///   operations were applied, for auditing and observability (it carries no
///   information needed for correctness),
/// * `failure`: accumulated shortfalls and leftovers.
///
/// Patches are plain data and combine with [`plus`](Self::plus), which behaves
/// as if all original operations were applied in order: later patches override
/// earlier slot values, logs concatenate, failures accumulate. `plus` is
/// associative and the [`Default`] patch is its two-sided identity.
///
/// Callers should only commit `modified` to a real container when
/// [`is_success`](Self::is_success) holds; [`Mutator`](crate::Mutator)
/// enforces this.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct Patch<A> {
    modified: BTreeMap<SlotIx, A>,
    diff: Vec<(SlotIx, A)>,
    failure: Failure<A>,
}

impl<A> Patch<A> {
    /// Assemble a patch from its parts.
    pub fn new(modified: BTreeMap<SlotIx, A>, diff: Vec<(SlotIx, A)>, failure: Failure<A>) -> Self {
        Self {
            modified,
            diff,
            failure,
        }
    }

    /// Patch for a placement step: `leftover` is the part of the request that
    /// found no space, if any.
    pub fn from_give(
        modified: BTreeMap<SlotIx, A>,
        diff: Vec<(SlotIx, A)>,
        leftover: Option<A>,
    ) -> Self {
        Self {
            modified,
            diff,
            failure: Failure {
                shortfall: Vec::new(),
                leftover: leftover.into_iter().collect(),
            },
        }
    }

    /// Patch for a withdrawal step: `shortfall` is the part of the request
    /// that could not be taken, if any.
    pub fn from_take(
        modified: BTreeMap<SlotIx, A>,
        diff: Vec<(SlotIx, A)>,
        shortfall: Option<A>,
    ) -> Self {
        Self {
            modified,
            diff,
            failure: Failure {
                shortfall: shortfall.into_iter().collect(),
                leftover: Vec::new(),
            },
        }
    }

    /// The final resulting value per affected slot.
    pub fn modified(&self) -> &BTreeMap<SlotIx, A> {
        &self.modified
    }

    /// The ordered log of per-slot moved amounts.
    pub fn diff(&self) -> &[(SlotIx, A)] {
        &self.diff
    }

    /// The accumulated failure record.
    pub fn failure(&self) -> &Failure<A> {
        &self.failure
    }

    /// Whether this patch represents a fully successful operation.
    ///
    /// True iff the patch modifies at least one slot *and* the failure record
    /// is empty. Note the first condition: a patch that legitimately changed
    /// nothing, such as giving zero items or giving to a container with no
    /// compatible slot at all, is *not* successful even though its failure
    /// record is empty. Callers that want to distinguish "nothing to do" from
    /// "could not be done" should inspect [`failure`](Self::failure) directly.
    pub fn is_success(&self) -> bool {
        !self.modified.is_empty() && self.failure.is_empty()
    }

    /// Combines two patches as if `self`'s operations were applied first and
    /// then `other`'s: `other` overrides shared slots, logs concatenate,
    /// failures concatenate.
    pub fn plus(mut self, other: Self) -> Self {
        self.modified.extend(other.modified);
        self.diff.extend(other.diff);
        self.failure = self.failure.plus(other.failure);
        self
    }
}

impl<A> Default for Patch<A> {
    /// The patch with no modifications, no log, and no failure; the identity
    /// for [`Patch::plus`].
    fn default() -> Self {
        Self {
            modified: BTreeMap::new(),
            diff: Vec::new(),
            failure: Failure::default(),
        }
    }
}

/// Accumulated failure information from inventory operations.
///
/// * `shortfall`: items that could not be fully withdrawn,
/// * `leftover`: items that could not be fully placed.
///
/// Failures are modeled as data, never as panics or early returns; they travel
/// with the [`Patch`] that produced them so partial results stay inspectable.
/// Concatenation ([`plus`](Self::plus)) is the only combination rule, and a
/// failure with both lists empty means "no failure".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure<A> {
    shortfall: Vec<A>,
    leftover: Vec<A>,
}

impl<A> Failure<A> {
    /// Assemble a failure record from its parts.
    pub fn new(shortfall: Vec<A>, leftover: Vec<A>) -> Self {
        Self {
            shortfall,
            leftover,
        }
    }

    /// Items that could not be fully withdrawn, one per unsatisfied request,
    /// with their amounts set to the unmet portion.
    pub fn shortfall(&self) -> &[A] {
        &self.shortfall
    }

    /// Items that could not be fully placed, one per unsatisfied request,
    /// with their amounts set to the unplaced portion.
    pub fn leftover(&self) -> &[A] {
        &self.leftover
    }

    /// Whether this record carries no failure at all.
    pub fn is_empty(&self) -> bool {
        self.shortfall.is_empty() && self.leftover.is_empty()
    }

    /// Concatenates both lists, `self`'s entries first.
    #[must_use]
    pub fn plus(mut self, other: Self) -> Self {
        self.shortfall.extend(other.shortfall);
        self.leftover.extend(other.leftover);
        self
    }
}

impl<A> Default for Failure<A> {
    fn default() -> Self {
        Self {
            shortfall: Vec::new(),
            leftover: Vec::new(),
        }
    }
}

/// Result of computing the placement of a single stack; see
/// [`SnapshotView::give_one`](crate::SnapshotView::give_one).
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct GiveResult<A> {
    /// The final resulting value per affected slot.
    pub modified: BTreeMap<SlotIx, A>,
    /// Per-slot placed amounts, in application order.
    pub diff: Vec<(SlotIx, A)>,
    /// The part of the request that found no space, if any.
    pub leftover: Option<A>,
}

impl<A> Default for GiveResult<A> {
    fn default() -> Self {
        Self {
            modified: BTreeMap::new(),
            diff: Vec::new(),
            leftover: None,
        }
    }
}

/// Result of computing the withdrawal of a single request; see
/// [`SnapshotView::take_one`](crate::SnapshotView::take_one).
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct TakeResult<A> {
    /// The final resulting value per affected slot.
    pub modified: BTreeMap<SlotIx, A>,
    /// Per-slot taken amounts, in application order.
    pub diff: Vec<(SlotIx, A)>,
    /// The part of the requested count that could not be taken; 0 if fully
    /// satisfied.
    pub remaining: u32,
}

impl<A> Default for TakeResult<A> {
    fn default() -> Self {
        Self {
            modified: BTreeMap::new(),
            diff: Vec::new(),
            remaining: 0,
        }
    }
}
