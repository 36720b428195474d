//! Bookkeeping for command tasks spawned by [`crate::StateCtx::flush_commands`].
//!
//! Each spawned command gets a [`TaskHandle`] pairing a [`TaskId`] with a
//! `CancellationToken`. Tokens are only cancelled when the context shuts down;
//! a newer run of the same command leaves older runs alone and whichever
//! finishes last wins.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Identifies one spawned command run.
///
/// Combines the command's `TypeId` with a context-wide generation counter, so two runs
/// of the same command can be told apart (and ordered by issue time) in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher values were issued later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a spawned command with cooperative cancellation.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Signals the task to stop at its next cancellation check point.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_orders_by_generation() {
        let type_id = TypeId::of::<String>();
        let older = TaskId::new(type_id, 1);
        let newer = TaskId::new(type_id, 2);

        assert_eq!(older.type_id(), newer.type_id());
        assert!(newer.generation() > older.generation());
        assert_ne!(older, newer);
    }

    #[test]
    fn task_id_distinguishes_types() {
        let a = TaskId::new(TypeId::of::<String>(), 1);
        let b = TaskId::new(TypeId::of::<i32>(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn task_handle_cancel_is_shared_between_clones() {
        let handle = TaskHandle::new(
            TaskId::new(TypeId::of::<String>(), 1),
            CancellationToken::new(),
        );
        let cloned = handle.clone();
        let token = handle.cancellation_token();

        assert!(!cloned.is_cancelled());
        handle.cancel();

        assert!(cloned.is_cancelled());
        assert!(token.is_cancelled());
    }
}
