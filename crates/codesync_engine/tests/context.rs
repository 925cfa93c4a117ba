mod common;

use std::sync::Arc;
use std::time::Duration;

use codesync_core::{Request, Response, UpdateState, STATE_KEY};
use codesync_engine::{
    sha256_hex, AutoplayFlag, DebounceSettings, DebounceState, MainFrameContext, MemoryStore,
    PlayerFrameContext, Selectors, SyncSettings,
};
use common::{init_logging, FakePage, RecordingSink, ScriptedFetcher, SOURCE_URL};
use tokio::time::sleep;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn main_frame(
    page: &Arc<FakePage>,
    fetcher: &Arc<ScriptedFetcher>,
    autoplay: &AutoplayFlag,
) -> MainFrameContext {
    MainFrameContext::install(
        page.clone(),
        fetcher.clone(),
        Arc::new(MemoryStore::new()),
        RecordingSink::new(),
        Selectors::default(),
        SyncSettings::default(),
        autoplay.clone(),
    )
    .expect("page has a play control")
}

fn update_state(url: &str, sync: bool, autoplay: bool) -> Request {
    Request::UpdateState(UpdateState {
        url: url.to_string(),
        is_sync_enabled: sync,
        is_autoplay_enabled: autoplay,
    })
}

#[tokio::test]
async fn items_round_trip_through_the_store() {
    init_logging();
    let page = FakePage::ide();
    let fetcher = ScriptedFetcher::new(vec![]);
    let main = main_frame(&page, &fetcher, &AutoplayFlag::default());

    assert_eq!(
        main.handle(Request::GetItem {
            key: STATE_KEY.to_string()
        }),
        Response::Value(None)
    );
    assert_eq!(
        main.handle(Request::SetItem {
            key: STATE_KEY.to_string(),
            value: "{\"url\":\"x\"}".to_string()
        }),
        Response::Ack
    );
    assert_eq!(
        main.handle(Request::GetItem {
            key: STATE_KEY.to_string()
        }),
        Response::Value(Some("{\"url\":\"x\"}".to_string()))
    );
}

#[test]
fn contexts_need_their_controls() {
    init_logging();
    let page = FakePage::empty();
    let fetcher = ScriptedFetcher::new(vec![]);
    let flag = AutoplayFlag::default();

    let main = MainFrameContext::install(
        page.clone(),
        fetcher,
        Arc::new(MemoryStore::new()),
        RecordingSink::new(),
        Selectors::default(),
        SyncSettings::default(),
        flag.clone(),
    );
    let player =
        PlayerFrameContext::install(page, RecordingSink::new(), DebounceSettings::default(), flag);

    assert!(main.is_none());
    assert!(player.is_none());
}

#[tokio::test(start_paused = true)]
async fn update_state_starts_and_stops_sync() {
    init_logging();
    let page = FakePage::ide();
    let fetcher = ScriptedFetcher::new(vec![Ok("A"), Ok("B")]);
    let main = main_frame(&page, &fetcher, &AutoplayFlag::default());

    main.handle(update_state(SOURCE_URL, true, false));
    assert!(main.sync_loop().is_running());
    assert_eq!(main.sync_loop().url().as_deref(), Some(SOURCE_URL));
    sleep(ms(3100)).await;
    assert_eq!(page.codes(), vec!["A".to_string()]);

    main.handle(update_state(SOURCE_URL, false, false));
    assert!(!main.sync_loop().is_running());
    assert_eq!(main.sync_loop().program_hash(), None);

    sleep(ms(10_000)).await;
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn autoplay_only_update_keeps_digest_and_chain() {
    init_logging();
    let page = FakePage::ide();
    let fetcher = ScriptedFetcher::new(vec![Ok("A"), Ok("A")]);
    let flag = AutoplayFlag::default();
    let main = main_frame(&page, &fetcher, &flag);

    main.handle(update_state(SOURCE_URL, true, false));
    sleep(ms(3100)).await;
    main.handle(update_state(SOURCE_URL, true, true));

    assert_eq!(main.sync_loop().program_hash(), Some(sha256_hex("A")));
    assert!(main.sync_loop().autoplay_enabled());
    assert!(flag.get());

    // Same body on the next tick: no re-dispatch, so no playback either.
    sleep(ms(3000)).await;
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(page.codes(), vec!["A".to_string()]);
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn url_change_restarts_with_fresh_digest() {
    init_logging();
    let page = FakePage::ide();
    let fetcher = ScriptedFetcher::new(vec![Ok("A"), Ok("A")]);
    let main = main_frame(&page, &fetcher, &AutoplayFlag::default());

    main.handle(update_state(SOURCE_URL, true, false));
    sleep(ms(3100)).await;
    main.handle(update_state("http://localhost:10101/Other.java", true, false));
    assert_eq!(main.sync_loop().program_hash(), None);
    sleep(ms(3100)).await;

    assert_eq!(page.codes(), vec!["A".to_string(), "A".to_string()]);
    assert_eq!(
        main.sync_loop().url().as_deref(),
        Some("http://localhost:10101/Other.java")
    );
}

#[tokio::test(start_paused = true)]
async fn autoplay_flag_reaches_player_frame() {
    init_logging();
    let page = FakePage::ide();
    page.set_control(".next-button", true);
    let fetcher = ScriptedFetcher::new(vec![]);
    let flag = AutoplayFlag::default();
    let main = main_frame(&page, &fetcher, &flag);
    let player = PlayerFrameContext::install(
        page.clone(),
        RecordingSink::new(),
        DebounceSettings::default(),
        flag.clone(),
    )
    .expect("page has a play/pause control");

    main.handle(update_state(SOURCE_URL, false, true));
    assert_eq!(player.on_mutation(), DebounceState::Armed);
    sleep(ms(10_100)).await;
    assert_eq!(page.clicks(), vec![".play-pause-button".to_string()]);

    main.handle(update_state(SOURCE_URL, false, false));
    player.on_mutation();
    sleep(ms(10_100)).await;
    assert_eq!(page.clicks().len(), 1);
    assert_eq!(player.debounce_state(), DebounceState::Idle);
}

#[tokio::test(start_paused = true)]
async fn player_frame_accepts_autoplay_broadcast() {
    init_logging();
    let page = FakePage::ide();
    page.set_control(".next-button", true);
    let flag = AutoplayFlag::new(true);
    let player = PlayerFrameContext::install(
        page.clone(),
        RecordingSink::new(),
        DebounceSettings::default(),
        flag.clone(),
    )
    .expect("page has a play/pause control");

    player.on_mutation();
    let reply = player.handle(Request::UpdateAutoplayEnabled {
        is_autoplay_enabled: false,
    });
    assert_eq!(reply, Response::Ack);
    assert!(!flag.get());

    sleep(ms(10_100)).await;
    assert!(page.clicks().is_empty());
}
