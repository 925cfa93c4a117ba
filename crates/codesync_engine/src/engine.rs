use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use codesync_core::{Request, Response};
use codesync_logging::{sync_info, sync_warn};
use thiserror::Error;

use crate::{
    AutoplayFlag, ChannelEventSink, DebounceSettings, EventSink, FetchError, FetchSettings,
    Fetcher, KeyValueStore, MainFrameContext, Page, PlayerFrameContext, ReqwestFetcher, Selectors,
    SyncEvent, SyncSettings,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub sync: SyncSettings,
    /// Quiet window of the playback debounce. The controls it watches and
    /// clicks come from `selectors`.
    pub debounce_delay: Duration,
    pub selectors: Selectors,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            sync: SyncSettings::default(),
            debounce_delay: DebounceSettings::default().delay,
            selectors: Selectors::default(),
        }
    }
}

impl EngineConfig {
    pub fn debounce_settings(&self) -> DebounceSettings {
        DebounceSettings {
            delay: self.debounce_delay,
            watched: self.selectors.next.clone(),
            target: self.selectors.play_pause.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

enum EngineCommand {
    Request {
        request: Request,
        reply: mpsc::Sender<Response>,
    },
    /// The watched player control changed an attribute.
    ControlsMutated,
}

/// Owns the runtime thread hosting both frame contexts.
///
/// Dropping the handle closes the command channel, which stops the loops
/// and shuts the runtime down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<SyncEvent>,
}

impl EngineHandle {
    pub fn new(
        config: EngineConfig,
        page: Arc<dyn Page>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, EngineError> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(config.fetch.clone())?);
        Self::with_fetcher(config, page, store, fetcher)
    }

    pub fn with_fetcher(
        config: EngineConfig,
        page: Arc<dyn Page>,
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let guard = runtime.enter();
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let autoplay = AutoplayFlag::default();
            let main = MainFrameContext::install(
                page.clone(),
                fetcher,
                store,
                sink.clone(),
                config.selectors.clone(),
                config.sync.clone(),
                autoplay.clone(),
            );
            let player =
                PlayerFrameContext::install(page, sink, config.debounce_settings(), autoplay);
            sync_info!(
                "Engine ready main_frame={} player_frame={}",
                main.is_some(),
                player.is_some()
            );

            while let Ok(command) = cmd_rx.recv() {
                handle_command(main.as_ref(), player.as_ref(), command);
            }

            // Stop the loops before the runtime they were spawned on goes away.
            drop(main);
            drop(player);
            drop(guard);
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Sends `request` to the frame that handles it and waits for the reply.
    pub fn request(&self, request: Request) -> Option<Response> {
        let (reply, reply_rx) = mpsc::channel();
        self.cmd_tx
            .send(EngineCommand::Request { request, reply })
            .ok()?;
        reply_rx.recv().ok()
    }

    pub fn notify_mutation(&self) {
        let _ = self.cmd_tx.send(EngineCommand::ControlsMutated);
    }

    pub fn try_recv(&self) -> Option<SyncEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<SyncEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    main: Option<&MainFrameContext>,
    player: Option<&PlayerFrameContext>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Request { request, reply } => {
            let response = route(main, player, request);
            let _ = reply.send(response);
        }
        EngineCommand::ControlsMutated => match player {
            Some(player) => {
                player.on_mutation();
            }
            None => sync_warn!("Control mutation without a player frame"),
        },
    }
}

fn route(
    main: Option<&MainFrameContext>,
    player: Option<&PlayerFrameContext>,
    request: Request,
) -> Response {
    if matches!(request, Request::UpdateAutoplayEnabled { .. }) {
        return player.map_or(Response::Ack, |player| player.handle(request));
    }
    match main {
        Some(main) => main.handle(request),
        None => {
            sync_warn!("No main frame to handle {:?}", request);
            match request {
                Request::GetItem { .. } => Response::Value(None),
                _ => Response::Ack,
            }
        }
    }
}
