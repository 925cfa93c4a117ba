//! Headless host: popup controller, console page and engine wired together.
mod config;
mod console_page;
mod effects;

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use codesync_core::{update, AppState, Effect, Msg, SyncState, STATE_KEY};
use codesync_engine::{EngineHandle, FileStore, KeyValueStore};
use codesync_logging::{sync_info, sync_warn};

use crate::cli::RunArgs;
pub use config::AppConfig;
use console_page::{ConsolePage, PageCommand};
use effects::{log_event, EffectRunner};

pub fn run(args: RunArgs, state_file: &Path, config: AppConfig) -> anyhow::Result<()> {
    let store = FileStore::open(state_file)
        .with_context(|| format!("opening state file {}", state_file.display()))?;
    let selectors = config.selectors();
    let page = Arc::new(ConsolePage::new(&selectors, args.mirror_to.clone()));
    let engine = EngineHandle::new(config.engine_config(), page.clone(), Arc::new(store))
        .context("starting engine")?;
    let runner = EffectRunner::new(&engine);

    let state = drive(AppState::new(), [Msg::Opened], &runner);
    let state = drive(state, popup_messages(&args), &runner);
    let view = state.view();
    sync_info!(
        "url={} valid={} sync={} autoplay={}",
        view.url,
        view.url_is_valid,
        view.sync_enabled,
        view.autoplay_enabled
    );
    if !view.url_is_valid {
        sync_warn!("Source URL {:?} does not parse; fetches will fail", view.url);
    }

    let commands = spawn_stdin_reader();
    loop {
        while let Some(event) = engine.try_recv() {
            log_event(&event);
        }
        match commands.recv_timeout(Duration::from_millis(50)) {
            Ok(PageCommand::Quit) => break,
            Ok(command) => {
                apply_command(&page, &command);
                if command.selector() == Some(selectors.next.as_str()) {
                    engine.notify_mutation();
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            // Stdin closed: keep syncing until the process is interrupted.
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                if let Some(event) = engine.recv_timeout(Duration::from_millis(200)) {
                    log_event(&event);
                }
            }
        }
    }

    sync_info!("Shutting down");
    Ok(())
}

pub fn show(state_file: &Path) -> anyhow::Result<()> {
    let store = FileStore::open(state_file)
        .with_context(|| format!("opening state file {}", state_file.display()))?;
    let state = match store.get_item(STATE_KEY)? {
        Some(json) => SyncState::from_json(&json)?,
        None => SyncState::default(),
    };
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Messages the popup would see from the user, in the order the flags imply.
fn popup_messages(args: &RunArgs) -> Vec<Msg> {
    let mut msgs = Vec::new();
    if let Some(url) = &args.url {
        msgs.push(Msg::UrlEdited(url.clone()));
    }
    if let Some(autoplay) = args.autoplay_toggle() {
        msgs.push(Msg::AutoplayToggled(autoplay));
    }
    if let Some(sync) = args.sync_toggle() {
        msgs.push(Msg::SyncToggled(sync));
    }
    // The engine starts empty, so the restored state has to be pushed once.
    msgs.push(Msg::Reapply);
    msgs
}

fn drive(
    mut state: AppState,
    msgs: impl IntoIterator<Item = Msg>,
    runner: &EffectRunner<'_>,
) -> AppState {
    let mut queue: VecDeque<Msg> = msgs.into_iter().collect();
    while let Some(msg) = queue.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(effects.into_iter().filter_map(|effect: Effect| runner.run(effect)));
    }
    state
}

fn apply_command(page: &ConsolePage, command: &PageCommand) {
    match command {
        PageCommand::SetDisabled { selector, disabled } => page.set_disabled(selector, *disabled),
        PageCommand::Remove { selector } => {
            if !page.remove(selector) {
                sync_warn!("No control {} to remove", selector);
            }
        }
        PageCommand::Quit => {}
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<PageCommand> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match PageCommand::parse(&line) {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(err) => sync_warn!("{}", err),
            }
        }
    });
    rx
}
