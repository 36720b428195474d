use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{debug, error, trace, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::updater::UpdateMessage;
use crate::{
    Command, CommandSnapshot, Compute, Dep, Error, Graph, State, StateSyncStatus,
    TaskHandle, TaskId, TopologyError, Updater,
};

type Snapshotter = fn(&(dyn Any + Send)) -> Option<Box<dyn Any + Send>>;
type Runner = fn(&(dyn Any + Send), Dep<'_>, Updater);

pub(crate) struct Slot {
    pub(crate) name: &'static str,
    pub(crate) value: Box<dyn Any + Send>,
    snapshot: Snapshotter,
    runner: Option<Runner>,
    status: StateSyncStatus,
}

fn snapshot_of<T: State>(value: &(dyn Any + Send)) -> Option<Box<dyn Any + Send>> {
    value
        .downcast_ref::<T>()
        .map(|v| Box::new(v.clone()) as Box<dyn Any + Send>)
}

fn run_compute<T: Compute>(value: &(dyn Any + Send), deps: Dep<'_>, updater: Updater) {
    if let Some(compute) = value.downcast_ref::<T>() {
        compute.compute(deps, updater);
    }
}

struct RecordedCommand {
    name: &'static str,
    command: Arc<dyn Command>,
}

/// Owner of all states, computes and commands of one view.
///
/// Frame loop used by the UI:
/// 1. [`StateCtx::sync_computes`] applies results published since the last frame.
/// 2. Widgets read (`state`, `cached`) and write (`update`, `enqueue_command`).
/// 3. [`StateCtx::run_computed`] re-runs dirty computes and spawns queued commands.
pub struct StateCtx {
    slots: BTreeMap<TypeId, Slot>,
    graph: Graph<TypeId>,
    compute_order: Vec<TypeId>,

    commands: BTreeMap<TypeId, RecordedCommand>,
    queue: VecDeque<TypeId>,

    send: Sender<UpdateMessage>,
    recv: Receiver<UpdateMessage>,

    tasks: JoinSet<()>,
    handles: HashMap<tokio::task::Id, TaskHandle>,
    generation: u64,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field(
                "slots",
                &self.slots.values().map(|s| s.name).collect::<Vec<_>>(),
            )
            .field("queued_commands", &self.queue.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            slots: BTreeMap::new(),
            graph: Graph::new(),
            compute_order: Vec::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            send,
            recv,
            tasks: JoinSet::new(),
            handles: HashMap::new(),
            generation: 0,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let name = state.name();
        self.slots.insert(
            TypeId::of::<T>(),
            Slot {
                name,
                value: Box::new(state),
                snapshot: snapshot_of::<T>,
                runner: None,
                status: StateSyncStatus::Clean,
            },
        );
        self.graph.add_node(TypeId::of::<T>());
    }

    /// Records a compute. It runs on the next [`StateCtx::run_all_dirty`].
    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        for dep in compute.deps() {
            self.graph.route_to(dep, id);
        }
        self.graph.add_node(id);
        self.slots.insert(
            id,
            Slot {
                name: compute.name(),
                value: Box::new(compute),
                snapshot: snapshot_of::<T>,
                runner: Some(run_compute::<T>),
                status: StateSyncStatus::Init,
            },
        );

        match self.verify_deps() {
            Ok(order) => self.compute_order = order,
            Err(err) => {
                error!("Compute dependencies are invalid, falling back to registration order: {err}");
                self.compute_order.push(id);
            }
        }
    }

    /// Checks the dependency graph and returns computes in run order.
    pub fn verify_deps(&self) -> Result<Vec<TypeId>, TopologyError<TypeId>> {
        let order = self.graph.topology_sort()?;
        Ok(order
            .into_iter()
            .filter(|id| self.slots.get(id).is_some_and(|s| s.runner.is_some()))
            .collect())
    }

    pub fn record_command<C: Command>(&mut self, command: C) {
        self.commands.insert(
            TypeId::of::<C>(),
            RecordedCommand {
                name: type_name::<C>(),
                command: Arc::new(command),
            },
        );
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("StateCtx::state"))
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Latest published value of compute `T`, if recorded.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` is not recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .ok_or_else(|| Error::compute_not_found::<T>("StateCtx::compute"))
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn status<T: State>(&self) -> Option<StateSyncStatus> {
        self.slots.get(&TypeId::of::<T>()).map(|slot| slot.status)
    }

    /// Mutates `T` in place and marks every compute reading it dirty.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        let id = TypeId::of::<T>();
        let Some(value) = self
            .slots
            .get_mut(&id)
            .and_then(|slot| slot.value.downcast_mut::<T>())
        else {
            warn!("update of unregistered state {}", type_name::<T>());
            return;
        };
        f(value);
        self.mark_downstream_dirty(id);
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub fn enqueue_command<C: Command>(&mut self) {
        self.queue.push_back(TypeId::of::<C>());
    }

    /// Enqueues `C` and flushes the queue right away.
    pub fn dispatch<C: Command>(&mut self) {
        self.enqueue_command::<C>();
        self.flush_commands();
    }

    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    /// Spawns every queued command on the current tokio runtime.
    pub fn flush_commands(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(
                "No tokio runtime available, dropping {} queued command(s)",
                self.queue.len()
            );
            self.queue.clear();
            return;
        };

        while let Some(id) = self.queue.pop_front() {
            let Some(recorded) = self.commands.get(&id) else {
                warn!("Skipping unrecorded command {id:?}");
                continue;
            };
            let name = recorded.name;
            let command = Arc::clone(&recorded.command);

            self.generation += 1;
            let task_id = TaskId::new(id, self.generation);
            let token = CancellationToken::new();
            let future = command.run(self.snapshot(), self.updater(), token.clone());

            let abort = self.tasks.spawn_on(future, &runtime);
            debug!("Spawned {name} (generation {})", task_id.generation());
            self.handles
                .insert(abort.id(), TaskHandle::new(task_id, token));
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, slot) in &self.slots {
            if let Some(value) = (slot.snapshot)(slot.value.as_ref()) {
                snap.insert_cloned(*id, value);
            }
        }
        snap
    }

    /// Applies everything published through updaters since the last call.
    pub fn sync_computes(&mut self) {
        self.reap_finished_tasks();

        while let Ok(message) = self.recv.try_recv() {
            match message {
                UpdateMessage::Set { id, name, value } => {
                    let Some(slot) = self.slots.get_mut(&id) else {
                        warn!("Dropping update for unregistered {name}");
                        continue;
                    };
                    trace!("Applying new value for {name}");
                    slot.value = value;
                    self.mark_downstream_dirty(id);
                }
                UpdateMessage::Mutate { id, name, apply } => {
                    let Some(slot) = self.slots.get_mut(&id) else {
                        warn!("Dropping mutation for unregistered {name}");
                        continue;
                    };
                    trace!("Applying mutation for {name}");
                    apply(slot.value.as_mut());
                    self.mark_downstream_dirty(id);
                }
                UpdateMessage::Enqueue { id, name } => {
                    if self.commands.contains_key(&id) {
                        self.queue.push_back(id);
                    } else {
                        warn!("{}", Error::CommandNotFound { name });
                    }
                }
            }
        }
    }

    fn mark_downstream_dirty(&mut self, id: TypeId) {
        let downstream: Vec<TypeId> = self.graph.downstream(id).iter().copied().collect();
        for dep in downstream {
            if let Some(slot) = self.slots.get_mut(&dep) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }

    /// Runs every compute that was never run or whose dependencies changed.
    pub fn run_all_dirty(&mut self) {
        let updater = self.updater();
        let mut ran = Vec::new();

        for id in &self.compute_order {
            let Some(slot) = self.slots.get(id) else {
                continue;
            };
            let Some(runner) = slot.runner else {
                continue;
            };
            if !slot.status.needs_run() {
                continue;
            }
            trace!("Running compute {}", slot.name);
            runner(slot.value.as_ref(), Dep::new(&self.slots), updater.clone());
            ran.push(*id);
        }

        for id in ran {
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.status = StateSyncStatus::Clean;
            }
        }
    }

    /// End-of-frame step: run dirty computes, collect what they enqueued, spawn commands.
    pub fn run_computed(&mut self) {
        self.run_all_dirty();
        self.sync_computes();
        self.flush_commands();
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of in-flight runs of command `C`.
    pub fn in_flight<C: Command>(&self) -> usize {
        let id = TypeId::of::<C>();
        self.handles
            .values()
            .filter(|handle| handle.id().type_id() == id)
            .count()
    }

    /// Waits for the next spawned command to finish. Returns `false` when none are left.
    pub async fn join_next(&mut self) -> bool {
        match self.tasks.join_next_with_id().await {
            Some(Ok((task, ()))) => {
                self.handles.remove(&task);
                true
            }
            Some(Err(err)) => {
                self.handles.remove(&err.id());
                if !err.is_cancelled() {
                    error!("Command task failed: {err}");
                }
                true
            }
            None => false,
        }
    }

    fn reap_finished_tasks(&mut self) {
        while let Some(joined) = self.tasks.try_join_next_with_id() {
            match joined {
                Ok((task, ())) => {
                    self.handles.remove(&task);
                }
                Err(err) => {
                    self.handles.remove(&err.id());
                    if !err.is_cancelled() {
                        error!("Command task failed: {err}");
                    }
                }
            }
        }
    }

    /// Cancels every in-flight command and drops pending work. Call when the view goes away.
    pub fn shutdown(&mut self) {
        for handle in self.handles.values() {
            handle.cancel();
        }
        self.handles.clear();
        self.queue.clear();
        self.tasks.abort_all();
        debug!("State context shut down");
    }
}
