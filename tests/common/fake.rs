//! Scriptable stand-ins for the repository and the terminal

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use stagehand::app::TerminalControl;
use stagehand::command::CommandSpec;
use stagehand::git::{Backend, DiffTarget, Interactive, Operation};
use stagehand::model::{File, PanelKind, Snapshot};

/// One canned answer to a query, optionally held until its gate opens
#[derive(Debug)]
struct Scripted {
    result: Result<Snapshot, String>,
    gate: Option<Receiver<()>>,
}

#[derive(Debug, Default)]
struct State {
    snapshots: HashMap<PanelKind, Snapshot>,
    scripted: HashMap<PanelKind, VecDeque<Scripted>>,
    diff_gates: VecDeque<Receiver<()>>,
    executed: Vec<Operation>,
    execute_error: Option<String>,
    interactive: Vec<Interactive>,
    program: Option<String>,
}

/// In-memory [`Backend`] recording everything asked of it
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    queries_started: AtomicUsize,
    queries_finished: AtomicUsize,
    diffs_started: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// What every unscripted query for `snapshot.kind()` returns
    pub fn set(&self, snapshot: Snapshot) {
        self.state.lock().snapshots.insert(snapshot.kind(), snapshot);
    }

    pub fn set_files(&self, files: Vec<File>) {
        self.set(Snapshot::Files {
            files,
            merging: false,
        });
    }

    /// Answer the next query for `kind` with `result`
    pub fn script(&self, kind: PanelKind, result: Result<Snapshot, String>) {
        self.state
            .lock()
            .scripted
            .entry(kind)
            .or_default()
            .push_back(Scripted { result, gate: None });
    }

    /// Answer the next query for `kind` with `result` once the returned sender
    /// fires (or is dropped)
    pub fn script_gated(&self, kind: PanelKind, result: Result<Snapshot, String>) -> Sender<()> {
        let (sender, gate) = mpsc::channel();
        self.state
            .lock()
            .scripted
            .entry(kind)
            .or_default()
            .push_back(Scripted {
                result,
                gate: Some(gate),
            });
        sender
    }

    /// Hold the next diff until the returned sender fires
    pub fn gate_next_diff(&self) -> Sender<()> {
        let (sender, gate) = mpsc::channel();
        self.state.lock().diff_gates.push_back(gate);
        sender
    }

    /// Make every following `execute` fail with `message`
    pub fn fail_execute(&self, message: &str) {
        self.state.lock().execute_error = Some(message.to_string());
    }

    /// Program returned for interactive requests (default `true`)
    pub fn set_program(&self, program: &str) {
        self.state.lock().program = Some(program.to_string());
    }

    pub fn executed(&self) -> Vec<Operation> {
        self.state.lock().executed.clone()
    }

    pub fn interactive_requests(&self) -> Vec<Interactive> {
        self.state.lock().interactive.clone()
    }

    pub fn queries_started(&self) -> usize {
        self.queries_started.load(Ordering::SeqCst)
    }

    pub fn queries_finished(&self) -> usize {
        self.queries_finished.load(Ordering::SeqCst)
    }

    pub fn diffs_started(&self) -> usize {
        self.diffs_started.load(Ordering::SeqCst)
    }

    fn empty(kind: PanelKind) -> Snapshot {
        match kind {
            PanelKind::Files => Snapshot::Files {
                files: Vec::new(),
                merging: false,
            },
            PanelKind::Branches => Snapshot::Branches(Vec::new()),
            PanelKind::Commits => Snapshot::Commits(Vec::new()),
            PanelKind::Stash => Snapshot::Stash(Vec::new()),
            PanelKind::Remotes => Snapshot::Remotes(Vec::new()),
        }
    }
}

impl Backend for FakeBackend {
    fn query(&self, kind: PanelKind) -> Result<Snapshot> {
        let scripted = {
            let mut state = self.state.lock();
            let next = state.scripted.get_mut(&kind).and_then(VecDeque::pop_front);
            next.unwrap_or_else(|| Scripted {
                result: Ok(state
                    .snapshots
                    .get(&kind)
                    .cloned()
                    .unwrap_or_else(|| Self::empty(kind))),
                gate: None,
            })
        };
        self.queries_started.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = scripted.gate {
            let _ = gate.recv();
        }
        self.queries_finished.fetch_add(1, Ordering::SeqCst);
        scripted.result.map_err(|message| anyhow!(message))
    }

    fn execute(&self, operation: &Operation) -> Result<()> {
        let mut state = self.state.lock();
        state.executed.push(operation.clone());
        match &state.execute_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn diff(&self, target: &DiffTarget) -> Result<String> {
        let gate = self.state.lock().diff_gates.pop_front();
        self.diffs_started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        Ok(format!("diff of {target:?}"))
    }

    fn interactive(&self, request: &Interactive) -> Result<CommandSpec> {
        let mut state = self.state.lock();
        state.interactive.push(request.clone());
        let program = state.program.clone().unwrap_or_else(|| "true".to_string());
        Ok(CommandSpec::new(program))
    }
}

/// [`TerminalControl`] that records calls instead of touching a tty
#[derive(Debug, Default)]
pub struct FakeTerminal {
    pub calls: Vec<&'static str>,
    pub fail_reclaim: bool,
}

impl TerminalControl for FakeTerminal {
    fn release(&mut self) -> Result<()> {
        self.calls.push("release");
        Ok(())
    }

    fn reclaim(&mut self) -> Result<()> {
        self.calls.push("reclaim");
        if self.fail_reclaim {
            return Err(anyhow!("terminal is gone"));
        }
        Ok(())
    }
}
