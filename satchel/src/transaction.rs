//! [`Transaction`], the sequential composition of patch-producing steps.

use core::fmt;

use crate::{Adapter, FrozenView, ItemOps, Patch, SnapshotView};

/// Composes multiple [`Patch`]-producing operations against an evolving
/// private snapshot, all or nothing.
///
/// Each [`updated`](Self::updated) step:
///
/// * runs the given function against the current snapshot,
/// * merges the returned patch into the cumulative patch with [`Patch::plus`],
/// * if the merged patch is successful, folds its modified slots forward into
///   the next snapshot; otherwise keeps the previous snapshot (discarding the
///   step's proposed writes) while retaining the merged patch so the failure
///   stays visible.
///
/// Once any step has left a non-empty failure the transaction is terminal: no
/// later step function is evaluated. Note that an unsuccessful step with an
/// *empty* failure (one that simply touched nothing) does not terminate the
/// transaction; see [`Patch::is_success`].
///
/// The final [`is_success`](Self::is_success) says whether every operation was
/// fully satisfied; only then should the cumulative patch be committed, e.g.
/// via [`Mutator::commit`](crate::Mutator::commit).
#[must_use]
pub struct Transaction<O: ItemOps> {
    snapshot: FrozenView<O>,
    patch: Patch<O::Item>,
}

// Manual impls required to set proper associated type bounds.
impl<O> Clone for Transaction<O>
where
    O: ItemOps + Clone,
    O::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            patch: self.patch.clone(),
        }
    }
}

impl<O> fmt::Debug for Transaction<O>
where
    O: ItemOps + fmt::Debug,
    O::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { snapshot, patch } = self;
        f.debug_struct("Transaction")
            .field("snapshot", snapshot)
            .field("patch", patch)
            .finish()
    }
}

impl<O: ItemOps + Clone> Transaction<O> {
    /// Start a transaction from the current contents of `view`.
    ///
    /// The transaction works on a frozen copy ([`SnapshotView::to_immutable`]),
    /// so later external changes to `view`'s backing store do not leak into
    /// the composition.
    pub fn begin(view: &SnapshotView<impl Adapter<Item = O::Item>, O>) -> Self {
        Self {
            snapshot: view.to_immutable(),
            patch: Patch::default(),
        }
    }

    /// Runs one step against the current snapshot and merges its patch, as
    /// described on [`Transaction`]. Returns the transaction unchanged, with
    /// `step` unevaluated, if a previous step already failed.
    pub fn updated(self, step: impl FnOnce(&FrozenView<O>) -> Patch<O::Item>) -> Self {
        if !self.patch.failure().is_empty() {
            return self;
        }
        let merged = self.patch.plus(step(&self.snapshot));
        if merged.is_success() {
            let snapshot = self.snapshot.updated(merged.modified());
            Self {
                snapshot,
                patch: merged,
            }
        } else {
            Self {
                snapshot: self.snapshot,
                patch: merged,
            }
        }
    }

    /// The snapshot as of the last successful step.
    pub fn snapshot(&self) -> &FrozenView<O> {
        &self.snapshot
    }

    /// The cumulative patch.
    pub fn patch(&self) -> &Patch<O::Item> {
        &self.patch
    }

    /// Whether the cumulative patch is fully successful.
    pub fn is_success(&self) -> bool {
        self.patch.is_success()
    }

    /// Discards the transaction and returns the final snapshot and cumulative
    /// patch.
    pub fn into_parts(self) -> (FrozenView<O>, Patch<O::Item>) {
        (self.snapshot, self.patch)
    }
}
