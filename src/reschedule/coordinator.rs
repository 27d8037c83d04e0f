//! Debounced batch-reschedule coordinator.
//!
//! Collects drag/resize edits from one chart and commits them in batches.
//!
//! # Commit cycle
//! 1. Each edit upserts `pending[key]` (last write wins) and re-arms a
//!    single-shot debounce timer.
//! 2. When the timer fires, `pending` is snapshotted and cleared in one
//!    step. Edits arriving later belong to the next cycle.
//! 3. The snapshot is split into an operation batch and a work-order batch
//!    and dispatched to the [`ScheduleUpdater`].
//! 4. On failure the affected edits go back into `pending`, unless a newer
//!    edit for the same task is already there or the coordinator was
//!    discarded while the cycle was in flight.
//!
//! # Concurrency
//! State sits behind a mutex that is never held across an await. Every
//! re-arm bumps a generation counter; a timer that wakes after being
//! superseded sees a different generation and does nothing, so it can never
//! take a snapshot meant for a later cycle.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::updates::{partition_edits, EditMap, PendingEdit, ResizeEvent, ScheduleUpdater};
use crate::config::{CoordinatorConfig, RestorePolicy};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::TaskKey;

/// Outcome of a successful commit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Work orders sent to the backend.
    pub work_orders: usize,
    /// Operations sent to the backend.
    pub operations: usize,
}

impl CommitReport {
    /// Whether the cycle had nothing to send.
    pub fn is_empty(&self) -> bool {
        self.work_orders == 0 && self.operations == 0
    }
}

/// Notification published after every non-empty commit cycle.
///
/// Subscribers typically re-fetch and re-project on `Committed`, and show
/// a message on `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitEvent {
    Committed(CommitReport),
    Failed {
        error: ScheduleError,
        /// Edits put back into the pending set.
        restored: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Staged {
    edit: PendingEdit,
    revision: u64,
}

#[derive(Default)]
struct State {
    pending: BTreeMap<TaskKey, Staged>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    next_revision: u64,
    /// Bumped by every discard; a cycle that sees it change restores nothing.
    discards: u64,
}

impl State {
    /// Invalidates any armed timer.
    fn disarm(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn restore(&mut self, entries: impl IntoIterator<Item = (TaskKey, Staged)>) -> usize {
        let mut restored = 0;
        for (key, staged) in entries {
            match self.pending.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(staged);
                    restored += 1;
                }
                Entry::Occupied(mut slot) if slot.get().revision < staged.revision => {
                    slot.insert(staged);
                    restored += 1;
                }
                Entry::Occupied(_) => {}
            }
        }
        restored
    }

    /// Drops pending edits older than ones the backend just accepted.
    fn forget_superseded(&mut self, committed: &BTreeMap<TaskKey, Staged>) {
        for (key, staged) in committed {
            if let Entry::Occupied(slot) = self.pending.entry(*key) {
                if slot.get().revision < staged.revision {
                    debug!(task = %key, "dropping edit superseded by a committed one");
                    slot.remove();
                }
            }
        }
    }
}

struct Inner<U> {
    updater: U,
    config: CoordinatorConfig,
    state: Mutex<State>,
    events: broadcast::Sender<CommitEvent>,
}

impl<U> Inner<U> {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Coalesces chart edits into batched backend updates.
///
/// Each chart owns its own coordinator; clones share state, so event
/// handlers and the embedding view can hold handles to the same instance.
/// Timers run on the ambient tokio runtime.
///
/// Dropping the last handle cancels an armed timer, so uncommitted edits
/// are dropped with it. A commit already in flight still completes.
pub struct RescheduleCoordinator<U> {
    owner: Arc<Owner<U>>,
}

/// Shared by coordinator handles only; timer tasks hold `Inner` directly.
struct Owner<U>(Arc<Inner<U>>);

impl<U> Drop for Owner<U> {
    fn drop(&mut self) {
        self.0.lock_state().disarm();
    }
}

impl<U> Clone for RescheduleCoordinator<U> {
    fn clone(&self) -> Self {
        Self {
            owner: Arc::clone(&self.owner),
        }
    }
}

impl<U: ScheduleUpdater + 'static> RescheduleCoordinator<U> {
    /// Creates a coordinator dispatching to `updater`.
    pub fn new(updater: U, config: CoordinatorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let inner = Arc::new(Inner {
            updater,
            config,
            state: Mutex::new(State::default()),
            events,
        });
        Self {
            owner: Arc::new(Owner(inner)),
        }
    }

    fn inner(&self) -> &Arc<Inner<U>> {
        &self.owner.0
    }

    /// Coordinator settings.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner().config
    }

    /// Subscribes to commit notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CommitEvent> {
        self.inner().events.subscribe()
    }

    /// Records a resized task and (re)starts the debounce window.
    ///
    /// Events missing either endpoint are ignored. Returns whether the
    /// edit was recorded.
    pub fn on_task_resized(
        &self,
        key: TaskKey,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> bool {
        let (Some(start), Some(end)) = (start, end) else {
            warn!(task = %key, "ignoring resize without both endpoints");
            return false;
        };

        let mut state = self.inner().lock_state();
        state.next_revision += 1;
        let revision = state.next_revision;
        state.pending.insert(
            key,
            Staged {
                edit: PendingEdit::new(start, end),
                revision,
            },
        );

        state.disarm();
        let generation = state.generation;
        match Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(self.inner());
                let delay = self.inner().config.debounce();
                state.timer = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    // Errors are published as events and logged.
                    let _ = commit(&inner, Some(generation)).await;
                }));
                debug!(task = %key, pending = state.pending.len(), "debounce armed");
            }
            Err(_) => {
                warn!(task = %key, "no async runtime; edit kept until flush_now");
            }
        }
        true
    }

    /// Parses a renderer event and records it.
    ///
    /// Returns `Ok(false)` for events missing an endpoint and an error for
    /// ids matching neither task id shape.
    pub fn handle_event(&self, event: &ResizeEvent) -> ScheduleResult<bool> {
        let key: TaskKey = event.id.parse().map_err(|err| {
            warn!(id = %event.id, "ignoring resize for unknown task id");
            err
        })?;
        Ok(self.on_task_resized(key, event.start, event.end))
    }

    /// Commits pending edits now, cancelling the debounce timer.
    pub async fn flush_now(&self) -> ScheduleResult<CommitReport> {
        commit(self.inner(), None).await
    }

    /// Drops all pending edits and the timer, e.g. when the view closes.
    ///
    /// Commits already in flight are not cancelled, but their edits are not
    /// restored if they fail. Returns the number of discarded edits.
    pub fn discard(&self) -> usize {
        let mut state = self.inner().lock_state();
        state.disarm();
        state.discards += 1;
        let discarded = state.pending.len();
        state.pending.clear();
        if discarded > 0 {
            debug!(discarded, "discarded pending edits");
        }
        discarded
    }

    /// Copy of the edits waiting for the next commit.
    pub fn pending(&self) -> EditMap {
        self.inner()
            .lock_state()
            .pending
            .iter()
            .map(|(key, staged)| (*key, staged.edit))
            .collect()
    }

    /// Number of edits waiting for the next commit.
    pub fn pending_len(&self) -> usize {
        self.inner().lock_state().pending.len()
    }

    /// Whether a debounce timer is armed.
    pub fn has_scheduled_commit(&self) -> bool {
        self.inner()
            .lock_state()
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

/// Runs one commit cycle.
///
/// `generation` is set when called from a timer; a mismatch means the timer
/// was superseded and the call is a no-op.
async fn commit<U: ScheduleUpdater>(
    inner: &Inner<U>,
    generation: Option<u64>,
) -> ScheduleResult<CommitReport> {
    let (snapshot, discards) = {
        let mut state = inner.lock_state();
        match generation {
            Some(expected) if expected != state.generation => {
                return Ok(CommitReport::default());
            }
            // This task now owns the cycle; dropping the handle keeps later
            // edits from aborting it mid-dispatch.
            Some(_) => state.timer = None,
            None => state.disarm(),
        }
        (std::mem::take(&mut state.pending), state.discards)
    };

    if snapshot.is_empty() {
        return Ok(CommitReport::default());
    }

    let batches = partition_edits(snapshot.iter().map(|(key, staged)| (key, &staged.edit)));
    let report = CommitReport {
        work_orders: batches.work_orders.len(),
        operations: batches.operations.len(),
    };
    let updater = &inner.updater;

    let (result, operations_failed, work_orders_failed) = match inner.config.restore_policy {
        RestorePolicy::WholeCycle => {
            let result = async {
                if !batches.operations.is_empty() {
                    updater.update_operation_dates(batches.operations).await?;
                }
                if !batches.work_orders.is_empty() {
                    updater.update_work_order_dates(batches.work_orders).await?;
                }
                Ok::<(), ScheduleError>(())
            }
            .await;
            let failed = result.is_err();
            (result, failed, failed)
        }
        RestorePolicy::FailedOnly => {
            let operations = if batches.operations.is_empty() {
                Ok(())
            } else {
                updater.update_operation_dates(batches.operations).await
            };
            let work_orders = if batches.work_orders.is_empty() {
                Ok(())
            } else {
                updater.update_work_order_dates(batches.work_orders).await
            };
            let (operations_failed, work_orders_failed) =
                (operations.is_err(), work_orders.is_err());
            (operations.and(work_orders), operations_failed, work_orders_failed)
        }
    };

    let (rejected, accepted): (BTreeMap<_, _>, BTreeMap<_, _>) =
        snapshot.into_iter().partition(|(key, _)| {
            if key.is_operation() {
                operations_failed
            } else {
                work_orders_failed
            }
        });

    let restored = {
        let mut state = inner.lock_state();
        if state.discards == discards {
            state.forget_superseded(&accepted);
            state.restore(rejected)
        } else {
            debug!("coordinator discarded during commit; nothing restored");
            0
        }
    };

    match result {
        Ok(()) => {
            info!(
                work_orders = report.work_orders,
                operations = report.operations,
                "reschedule committed"
            );
            let _ = inner.events.send(CommitEvent::Committed(report));
            Ok(report)
        }
        Err(error) => {
            warn!(%error, restored, "reschedule commit failed; edits restored");
            let _ = inner.events.send(CommitEvent::Failed {
                error: error.clone(),
                restored,
            });
            Err(error)
        }
    }
}
