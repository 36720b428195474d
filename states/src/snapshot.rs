use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Error, State};

/// Owned copy of every stored entry, handed to a command when it is flushed.
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl std::fmt::Debug for CommandSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSnapshot")
            .field("entries", &self.inner.len())
            .finish()
    }
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_cloned(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    /// Inserts a value directly. Used by tests that drive a command without a context.
    pub fn with<T: State>(mut self, value: T) -> Self {
        self.inner.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("command snapshot"))
    }

    /// Returns the snapshot of state `T`.
    ///
    /// # Panics
    /// Panics if `T` was not registered in the context the snapshot was taken from.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the snapshot of compute `T`.
    ///
    /// # Panics
    /// Panics if `T` was not recorded in the context the snapshot was taken from.
    pub fn compute<T: State>(&self) -> &T {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}
