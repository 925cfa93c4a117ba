#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use codesync_core::NotificationEvent;
use codesync_engine::{
    ControlState, EventSink, FailureKind, FetchError, FetchOutput, Fetcher, Page, PageError,
    SyncEvent,
};

pub const SOURCE_URL: &str = "http://localhost:10101/Player.java";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(codesync_logging::initialize_for_tests);
}

/// In-memory IDE page recording clicks and dispatched events.
#[derive(Default)]
pub struct FakePage {
    controls: Mutex<HashMap<String, ControlState>>,
    clicks: Mutex<Vec<String>>,
    events: Mutex<Vec<NotificationEvent>>,
}

impl FakePage {
    /// Page with every IDE control: replay disabled, next button enabled.
    pub fn ide() -> Arc<Self> {
        let page = Self::default();
        page.set_control(".play", false);
        page.set_control(".replay", true);
        page.set_control(".next-button", false);
        page.set_control(".play-pause-button", false);
        Arc::new(page)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_control(&self, selector: &str, disabled: bool) {
        self.controls
            .lock()
            .unwrap()
            .insert(selector.to_string(), ControlState { disabled });
    }

    pub fn remove_control(&self, selector: &str) {
        self.controls.lock().unwrap().remove(selector);
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn codes(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| event.code().map(str::to_string))
            .collect()
    }
}

impl Page for FakePage {
    fn control(&self, selector: &str) -> Option<ControlState> {
        self.controls.lock().unwrap().get(selector).copied()
    }

    fn click(&self, selector: &str) -> Result<(), PageError> {
        if self.control(selector).is_none() {
            return Err(PageError::ControlNotFound(selector.to_string()));
        }
        self.clicks.lock().unwrap().push(selector.to_string());
        Ok(())
    }

    fn dispatch(&self, event: &NotificationEvent) -> Result<(), PageError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Fetcher replaying a fixed script of bodies and failures.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<String, FailureKind>>>,
    calls: AtomicUsize,
    latency: Duration,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<&str, FailureKind>>) -> Arc<Self> {
        Self::with_latency(script, Duration::ZERO)
    }

    pub fn with_latency(script: Vec<Result<&str, FailureKind>>, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|step| step.map(str::to_string))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
            latency,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Ok(text)) => Ok(FetchOutput {
                byte_len: text.len() as u64,
                text,
                status: 200,
            }),
            Some(Err(kind)) => Err(FetchError::new(kind, "scripted failure")),
            None => Err(FetchError::new(FailureKind::Network, "script exhausted")),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}
