use std::any::TypeId;
use std::collections::BTreeMap;

use crate::ctx::Slot;
use crate::{Compute, Error, State};

/// Read-only view of the store handed to [`Compute::compute`].
#[derive(Clone, Copy)]
pub struct Dep<'a> {
    slots: &'a BTreeMap<TypeId, Slot>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(slots: &'a BTreeMap<TypeId, Slot>) -> Self {
        Self { slots }
    }

    pub fn try_state_ref<T: State>(&self) -> Result<&'a T, Error> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("compute dependency"))
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.try_state_ref::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if `T` is not recorded.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .ok_or_else(|| Error::compute_not_found::<T>("compute dependency"))
            .unwrap_or_else(|err| panic!("{err}"))
    }
}
