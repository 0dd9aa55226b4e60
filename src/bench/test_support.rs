use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::error::InvokeError;
use crate::invoker::Invoker;

fn rejected(message: &str) -> InvokeError {
    InvokeError::Rpc {
        code: -32000,
        message: message.to_owned(),
    }
}

/// Every call sleeps `delay`, then succeeds or fails.
pub(crate) struct FixedDelayInvoker {
    pub(crate) delay: Duration,
    pub(crate) fail: bool,
    pub(crate) calls: AtomicUsize,
}

impl FixedDelayInvoker {
    pub(crate) const fn ok(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) const fn failing(delay: Duration) -> Self {
        Self {
            delay,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Invoker for FixedDelayInvoker {
    async fn invoke(&self, _method: &str, _params: &[Value]) -> Result<Value, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        if self.fail {
            return Err(rejected("scripted failure"));
        }
        Ok(json!("0x1"))
    }
}

/// Plays back one `(delay, succeeds)` outcome per call, in call order.
/// Calls past the end of the script succeed immediately.
pub(crate) struct ScriptedInvoker {
    pub(crate) script: Vec<(Duration, bool)>,
    pub(crate) next: AtomicUsize,
}

impl ScriptedInvoker {
    pub(crate) const fn new(script: Vec<(Duration, bool)>) -> Self {
        Self {
            script,
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Invoker for ScriptedInvoker {
    async fn invoke(&self, _method: &str, _params: &[Value]) -> Result<Value, InvokeError> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let (delay, succeeds) = self.script.get(index).copied().unwrap_or((Duration::ZERO, true));
        sleep(delay).await;
        if succeeds {
            Ok(json!(index))
        } else {
            Err(rejected("scripted failure"))
        }
    }
}

/// The endpoint serves one call at a time, so throughput is flat no matter
/// how many calls are in flight.
pub(crate) struct SerializedInvoker {
    pub(crate) service_time: Duration,
    pub(crate) gate: Semaphore,
}

impl SerializedInvoker {
    pub(crate) fn new(service_time: Duration) -> Self {
        Self {
            service_time,
            gate: Semaphore::new(1),
        }
    }
}

#[async_trait]
impl Invoker for SerializedInvoker {
    async fn invoke(&self, _method: &str, _params: &[Value]) -> Result<Value, InvokeError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|err| rejected(&err.to_string()))?;
        sleep(self.service_time).await;
        Ok(json!("0x1"))
    }
}

/// Fails every call of a wave whose peak in-flight count exceeds `limit`.
///
/// The peak resets once the last call of a wave settles, so each wave is
/// judged on its own size.
pub(crate) struct InFlightLimitInvoker {
    pub(crate) limit: usize,
    pub(crate) delay: Duration,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) peak: AtomicUsize,
}

impl InFlightLimitInvoker {
    pub(crate) const fn new(limit: usize, delay: Duration) -> Self {
        Self {
            limit,
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Invoker for InFlightLimitInvoker {
    async fn invoke(&self, _method: &str, _params: &[Value]) -> Result<Value, InvokeError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak.fetch_max(current, Ordering::SeqCst);
        sleep(self.delay).await;
        let overloaded = self.peak.load(Ordering::SeqCst) > self.limit;
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.peak.store(0, Ordering::SeqCst);
        }
        if overloaded {
            return Err(rejected("endpoint overloaded"));
        }
        Ok(json!("0x1"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallEvent {
    Start(usize),
    End(usize),
}

/// Logs the start and end of every call in the order they happen.
pub(crate) struct RecordingInvoker {
    pub(crate) delay: Duration,
    pub(crate) next: AtomicUsize,
    pub(crate) events: Mutex<Vec<CallEvent>>,
}

impl RecordingInvoker {
    pub(crate) const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn events(&self) -> Vec<CallEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CallEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[async_trait]
impl Invoker for RecordingInvoker {
    async fn invoke(&self, _method: &str, _params: &[Value]) -> Result<Value, InvokeError> {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.push(CallEvent::Start(id));
        sleep(self.delay).await;
        self.push(CallEvent::End(id));
        Ok(json!(id))
    }
}
