//! Reactive state store used by the roster admin panel.
//!
//! The store keeps three kinds of entries, all addressed by their Rust type:
//! - `State`: plain values the UI writes through [`StateCtx::update`].
//! - `Compute`: values derived from other entries, re-run when a dependency becomes dirty.
//! - `Command`: manual-only async work (network IO) that publishes results via an [`Updater`].
//!
//! Every mutation is applied on the thread that owns the [`StateCtx`] inside
//! [`StateCtx::sync_computes`], so readers never observe a half-applied update.

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod time;
mod updater;

pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use snapshot::CommandSnapshot;
pub use state::State;
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use time::Time;
pub use updater::Updater;

pub use tokio_util::sync::CancellationToken;
