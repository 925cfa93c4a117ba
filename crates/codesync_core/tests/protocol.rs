use codesync_core::{NotificationEvent, Request, Response, UpdateState};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn requests_use_the_extension_wire_names() {
    let set: Request =
        serde_json::from_value(json!({"message": "set-item", "key": "state", "value": "{}"}))
            .unwrap();
    assert_eq!(
        set,
        Request::SetItem {
            key: "state".to_string(),
            value: "{}".to_string()
        }
    );

    let get: Request = serde_json::from_value(json!({"message": "get-item", "key": "state"})).unwrap();
    assert_eq!(
        get,
        Request::GetItem {
            key: "state".to_string()
        }
    );

    let update: Request = serde_json::from_value(json!({
        "message": "update-state",
        "url": "http://localhost:10101/Player.java",
        "isSyncEnabled": true,
        "isAutoplayEnabled": false
    }))
    .unwrap();
    assert_eq!(
        update,
        Request::UpdateState(UpdateState {
            url: "http://localhost:10101/Player.java".to_string(),
            is_sync_enabled: true,
            is_autoplay_enabled: false,
        })
    );
}

#[test]
fn autoplay_broadcast_serializes_camel_case() {
    let value = serde_json::to_value(Request::UpdateAutoplayEnabled {
        is_autoplay_enabled: true,
    })
    .unwrap();
    assert_eq!(
        value,
        json!({"message": "update-autoplay-enabled", "isAutoplayEnabled": true})
    );
}

#[test]
fn responses_mirror_send_response() {
    assert_eq!(serde_json::to_value(Response::Ack).unwrap(), json!(null));
    assert_eq!(serde_json::to_value(Response::Value(None)).unwrap(), json!(null));
    assert_eq!(
        serde_json::to_value(Response::Value(Some("x".to_string()))).unwrap(),
        json!("x")
    );
}

#[test]
fn notification_event_shape() {
    let event = NotificationEvent::update_code("class Player {}");
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({
            "type": "ExternalEditorToIDE",
            "detail": {"status": "updateCode", "code": "class Player {}"}
        })
    );
    assert_eq!(event.code(), Some("class Player {}"));
}
