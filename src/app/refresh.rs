//! Background queries and their serialized application
//!
//! Every query runs on its own thread and reports back over one channel. The
//! main loop drains that channel right before drawing, which is the only place
//! query results reach the [`Store`]. Each target carries a generation counter:
//! a result older than the newest one already applied is dropped.

use crate::git::{Backend, DiffTarget, Operation};
use crate::model::{PanelKind, Snapshot};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::store::{MainView, Store};

/// Long-running backend calls announced with a message overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTag {
    /// `git pull`
    Pull,
    /// `git push`
    Push,
    /// `git fetch`
    Fetch,
}

impl TaskTag {
    /// Title of the overlay announcing the task
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Pull => "Pull",
            Self::Push => "Push",
            Self::Fetch => "Fetch",
        }
    }
}

/// What a generation counter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// One panel
    Panel(PanelKind),
    /// The main view
    Main,
}

#[derive(Debug)]
enum Completion {
    Query {
        kind: PanelKind,
        generation: u64,
        result: Result<Snapshot>,
    },
    Diff {
        generation: u64,
        title: String,
        result: Result<String>,
    },
    Task {
        tag: TaskTag,
        result: Result<()>,
        then_refresh: bool,
    },
}

/// Something the caller has to act on after a drain
#[derive(Debug)]
pub enum RefreshEvent {
    /// A query failed; show it as an error overlay
    Failed(String),
    /// A background task finished
    TaskDone {
        /// Which task
        tag: TaskTag,
        /// Failure message, if any
        error: Option<String>,
        /// Whether every panel should be re-queried
        then_refresh: bool,
    },
}

/// Summary of one drain
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Panels whose snapshot was applied, in arrival order
    pub applied: Vec<PanelKind>,
    /// Results dropped as stale
    pub discarded: usize,
    /// Follow-ups for the caller
    pub events: Vec<RefreshEvent>,
}

/// Schedules backend queries and applies their results in generation order
#[derive(Debug)]
pub struct RefreshCoordinator {
    backend: Arc<dyn Backend>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    requested: HashMap<Target, u64>,
    applied: HashMap<Target, u64>,
    tasks: HashSet<TaskTag>,
}

impl RefreshCoordinator {
    /// Coordinator querying `backend`
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            sender,
            receiver,
            requested: HashMap::new(),
            applied: HashMap::new(),
            tasks: HashSet::new(),
        }
    }

    /// Query one panel in the background; returns the request's generation
    pub fn request(&mut self, kind: PanelKind) -> u64 {
        let generation = self.next_generation(Target::Panel(kind));
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        tracing::debug!(%kind, generation, "Refresh requested");
        thread::spawn(move || {
            let result = backend.query(kind);
            if sender
                .send(Completion::Query {
                    kind,
                    generation,
                    result,
                })
                .is_err()
            {
                tracing::debug!(%kind, generation, "Refresh result dropped, receiver gone");
            }
        });
        generation
    }

    /// Query every panel in `kinds`
    pub fn request_all(&mut self, kinds: &[PanelKind]) {
        for kind in kinds {
            self.request(*kind);
        }
    }

    /// Produce the main view for `target` in the background
    pub fn request_diff(&mut self, title: String, target: DiffTarget) -> u64 {
        let generation = self.next_generation(Target::Main);
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = backend.diff(&target);
            if sender
                .send(Completion::Diff {
                    generation,
                    title,
                    result,
                })
                .is_err()
            {
                tracing::debug!(generation, "Diff result dropped, receiver gone");
            }
        });
        generation
    }

    /// Run a long backend call in the background
    ///
    /// Returns `false` without starting anything if a task with the same tag
    /// is still running.
    pub fn spawn_task(&mut self, tag: TaskTag, operation: Operation, then_refresh: bool) -> bool {
        if !self.tasks.insert(tag) {
            return false;
        }
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        tracing::info!(?tag, ?operation, "Background task started");
        thread::spawn(move || {
            let result = backend.execute(&operation);
            if sender
                .send(Completion::Task {
                    tag,
                    result,
                    then_refresh,
                })
                .is_err()
            {
                tracing::debug!(?tag, "Task result dropped, receiver gone");
            }
        });
        true
    }

    /// Mark everything requested so far for `target` as stale
    pub fn supersede(&mut self, target: Target) {
        let generation = self.next_generation(target);
        self.applied.insert(target, generation);
    }

    /// Whether a task with `tag` is running
    #[must_use]
    pub fn task_running(&self, tag: TaskTag) -> bool {
        self.tasks.contains(&tag)
    }

    /// Whether the newest request for `target` has not been applied yet
    #[must_use]
    pub fn in_flight(&self, target: Target) -> bool {
        generation_of(&self.requested, target) > generation_of(&self.applied, target)
    }

    /// Highest generation requested for `target`
    #[must_use]
    pub fn requested_generation(&self, target: Target) -> u64 {
        generation_of(&self.requested, target)
    }

    /// Highest generation applied for `target`
    #[must_use]
    pub fn applied_generation(&self, target: Target) -> u64 {
        generation_of(&self.applied, target)
    }

    /// Apply every completion that has arrived
    ///
    /// Must only be called from the main loop. A failed query still counts as
    /// applied, so an older success arriving afterwards is dropped too.
    pub fn drain(&mut self, store: &mut Store) -> DrainReport {
        let mut report = DrainReport::default();

        while let Ok(completion) = self.receiver.try_recv() {
            match completion {
                Completion::Query {
                    kind,
                    generation,
                    result,
                } => {
                    if !self.accept(Target::Panel(kind), generation) {
                        report.discarded += 1;
                        continue;
                    }
                    match result {
                        Ok(snapshot) => {
                            store.apply(snapshot);
                            report.applied.push(kind);
                        }
                        Err(e) => {
                            tracing::warn!(%kind, generation, "Refresh failed: {e:#}");
                            report
                                .events
                                .push(RefreshEvent::Failed(format!("{e:#}")));
                        }
                    }
                }
                Completion::Diff {
                    generation,
                    title,
                    result,
                } => {
                    if !self.accept(Target::Main, generation) {
                        report.discarded += 1;
                        continue;
                    }
                    let text = result.unwrap_or_else(|e| {
                        tracing::warn!(generation, "Diff failed: {e:#}");
                        format!("{e:#}")
                    });
                    store.set_main(MainView::new(title, &text));
                }
                Completion::Task {
                    tag,
                    result,
                    then_refresh,
                } => {
                    self.tasks.remove(&tag);
                    let error = result.err().map(|e| format!("{e:#}"));
                    tracing::info!(?tag, failed = error.is_some(), "Background task finished");
                    report.events.push(RefreshEvent::TaskDone {
                        tag,
                        error,
                        then_refresh,
                    });
                }
            }
        }

        report
    }

    fn next_generation(&mut self, target: Target) -> u64 {
        let generation = self.requested.entry(target).or_insert(0);
        *generation += 1;
        *generation
    }

    fn accept(&mut self, target: Target, generation: u64) -> bool {
        let applied = self.applied.entry(target).or_insert(0);
        if generation < *applied {
            tracing::debug!(?target, generation, applied = *applied, "Discarding stale result");
            return false;
        }
        *applied = generation;
        true
    }
}

fn generation_of(map: &HashMap<Target, u64>, target: Target) -> u64 {
    map.get(&target).copied().unwrap_or(0)
}
