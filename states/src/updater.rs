use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};

use flume::Sender;
use log::debug;

use crate::{Command, State};

pub(crate) type Mutation = Box<dyn FnOnce(&mut (dyn Any + Send)) + Send>;

/// Message sent from computes/commands back to the owning [`crate::StateCtx`].
pub(crate) enum UpdateMessage {
    Set {
        id: TypeId,
        name: &'static str,
        value: Box<dyn Any + Send>,
    },
    Mutate {
        id: TypeId,
        name: &'static str,
        apply: Mutation,
    },
    Enqueue {
        id: TypeId,
        name: &'static str,
    },
}

/// Send-safe handle used to publish results into the store.
///
/// Nothing is applied until the owner calls [`crate::StateCtx::sync_computes`]; messages
/// are applied in the order they were sent.
#[derive(Clone)]
pub struct Updater {
    send: Sender<UpdateMessage>,
}

impl Debug for Updater {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("pending", &self.send.len())
            .finish()
    }
}

impl Updater {
    pub(crate) fn new(send: Sender<UpdateMessage>) -> Self {
        Self { send }
    }

    /// Replaces the stored value of `T`.
    pub fn set<T: State>(&self, value: T) {
        self.send_message(UpdateMessage::Set {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            value: Box::new(value),
        });
    }

    /// Mutates the stored value of `T` in place, on the owner thread.
    ///
    /// Prefer this over [`Updater::set`] when the new value depends on whatever is
    /// stored at apply time rather than on a snapshot taken earlier.
    pub fn update<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let apply: Mutation = Box::new(move |any| {
            if let Some(value) = any.downcast_mut::<T>() {
                f(value);
            }
        });
        self.send_message(UpdateMessage::Mutate {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            apply,
        });
    }

    /// Asks the owner to enqueue command `C`; it runs on the next flush.
    pub fn enqueue_command<C: Command>(&self) {
        self.send_message(UpdateMessage::Enqueue {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        });
    }

    fn send_message(&self, message: UpdateMessage) {
        if self.send.send(message).is_err() {
            debug!("Update dropped: state context is gone");
        }
    }
}
