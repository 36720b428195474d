use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

/// Future returned by [`Command::run`].
pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Manual-only unit of work.
///
/// Commands never run implicitly. The UI (or a compute, through
/// [`Updater::enqueue_command`]) enqueues them and [`crate::StateCtx::flush_commands`]
/// spawns them with a snapshot of the store taken at flush time.
///
/// The cancellation token only fires when the owning context shuts down. A newer run
/// of the same command does not cancel older ones.
pub trait Command: Send + Sync + 'static {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture;
}
