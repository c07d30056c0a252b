//! Scripted Input Source and Handler that record what the dispatch loop does.

use anyhow::Result;
use async_trait::async_trait;
use jobrunner_core::{CancellationToken, Fault, Handler, HandlerError, InputSource};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{watch, Notify};

pub type Input = &'static str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(Option<Input>),
    Wait,
    Complete(Input),
    Fault(Input, String),
    Canceled(Input),
}

#[derive(Default)]
struct SourceState {
    pending: VecDeque<Input>,
    closed: bool,
    calls: Vec<Call>,
    gets_after_stop: usize,
}

pub struct ScriptedSource {
    stop: CancellationToken,
    state: Mutex<SourceState>,
    arrived: Notify,
    fail_get: bool,
    fail_wait: bool,
    fail_complete: bool,
    fail_exception: bool,
    fail_canceled: bool,
}

impl ScriptedSource {
    /// `stop` is only observed to record calls made after it fired.
    pub fn new(stop: &CancellationToken, inputs: &[Input]) -> Self {
        Self {
            stop: stop.clone(),
            state: Mutex::new(SourceState {
                pending: inputs.iter().copied().collect(),
                ..Default::default()
            }),
            arrived: Notify::new(),
            fail_get: false,
            fail_wait: false,
            fail_complete: false,
            fail_exception: false,
            fail_canceled: false,
        }
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn failing_wait(mut self) -> Self {
        self.fail_wait = true;
        self
    }

    pub fn failing_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    pub fn failing_exception(mut self) -> Self {
        self.fail_exception = true;
        self
    }

    pub fn failing_canceled(mut self) -> Self {
        self.fail_canceled = true;
        self
    }

    pub fn push(&self, input: Input) {
        self.state.lock().unwrap().pending.push_back(input);
        self.arrived.notify_one();
    }

    pub fn close(&self) {
        self.state.lock().unwrap().closed = true;
        self.arrived.notify_one();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn get_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Get(_)))
    }

    pub fn wait_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Wait))
    }

    pub fn reports(&self) -> usize {
        self.count(|c| matches!(c, Call::Complete(_) | Call::Fault(..) | Call::Canceled(_)))
    }

    pub fn gets_after_stop(&self) -> usize {
        self.state.lock().unwrap().gets_after_stop
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl InputSource<Input> for ScriptedSource {
    async fn get_next_input(&self) -> Result<Option<Input>> {
        if self.fail_get {
            anyhow::bail!("source unavailable");
        }
        let mut state = self.state.lock().unwrap();
        if self.stop.is_cancelled() {
            state.gets_after_stop += 1;
        }
        let next = state.pending.pop_front();
        state.calls.push(Call::Get(next));
        Ok(next)
    }

    async fn wait_for_next_input(&self, stop: &CancellationToken) -> Result<Option<Input>> {
        self.record(Call::Wait);
        if self.fail_wait {
            anyhow::bail!("wait failed");
        }
        loop {
            {
                let mut state = self.state.lock().unwrap();
                if let Some(next) = state.pending.pop_front() {
                    return Ok(Some(next));
                }
                if state.closed {
                    return Ok(None);
                }
            }
            tokio::select! {
                _ = self.arrived.notified() => {}
                _ = stop.cancelled() => return Ok(None),
            }
        }
    }

    async fn complete_input(&self, input: Input) -> Result<()> {
        if self.fail_complete {
            anyhow::bail!("complete rejected for {}", input);
        }
        self.record(Call::Complete(input));
        Ok(())
    }

    async fn handle_exception_for_input(&self, input: Input, fault: Fault) -> Result<()> {
        if self.fail_exception {
            anyhow::bail!("exception report rejected for {}", input);
        }
        self.record(Call::Fault(input, fault.to_string()));
        Ok(())
    }

    async fn handle_canceled_input(&self, input: Input) -> Result<()> {
        if self.fail_canceled {
            anyhow::bail!("cancel report rejected for {}", input);
        }
        self.record(Call::Canceled(input));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail(&'static str),
    Panic(&'static str),
    /// Give up without the stop signal.
    Cancel,
    /// Run until the stop signal fires, then report canceled.
    UntilStop,
    Sleep(u64),
}

pub struct ScriptedHandler {
    default: Behavior,
    behaviors: HashMap<Input, Behavior>,
    gated: HashSet<Input>,
    gate: watch::Sender<bool>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedHandler {
    pub fn new(default: Behavior) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            default,
            behaviors: HashMap::new(),
            gated: HashSet::new(),
            gate,
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn on(mut self, input: Input, behavior: Behavior) -> Self {
        self.behaviors.insert(input, behavior);
        self
    }

    /// `input` waits for `open_gate` before doing anything.
    pub fn gated(mut self, input: Input) -> Self {
        self.gated.insert(input);
        self
    }

    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn act(&self, input: Input, stop: CancellationToken) -> Result<(), HandlerError> {
        if self.gated.contains(input) {
            let mut rx = self.gate.subscribe();
            let _ = rx.wait_for(|open| *open).await;
        }
        match self.behaviors.get(input).copied().unwrap_or(self.default) {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(msg) => Err(anyhow::anyhow!(msg).into()),
            Behavior::Panic(msg) => panic!("{}", msg),
            Behavior::Cancel => Err(HandlerError::Canceled),
            Behavior::UntilStop => {
                stop.cancelled().await;
                Err(HandlerError::Canceled)
            }
            Behavior::Sleep(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Handler<Input> for ScriptedHandler {
    async fn handle(&self, input: Input, stop: CancellationToken) -> Result<(), HandlerError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let result = self.act(input, stop).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
