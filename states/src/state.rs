use std::any::Any;
use std::fmt::Debug;

/// A value stored in [`crate::StateCtx`].
///
/// States are cloned into a [`crate::CommandSnapshot`] whenever a command is flushed,
/// so they must be cheap enough to clone and safe to move to a worker task.
pub trait State: Any + Clone + Debug + Send {
    /// Human readable name used in log lines.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
