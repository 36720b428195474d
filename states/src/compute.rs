use std::any::TypeId;

use crate::{Dep, State, Updater};

/// Type ids of the states/computes a compute reads.
pub type ComputeDeps = Vec<TypeId>;

/// A derived value that re-runs whenever one of its dependencies changes.
///
/// `compute` receives read-only access to its dependencies and publishes new values
/// through the [`Updater`]. It must not do network IO; enqueue a command instead. A run
/// leaves the compute clean until a dependency changes again.
pub trait Compute: State {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);
}
