use bonfire_protocol::{
    CloudSettingsPatch, SessionPatch, ViewMode, ViewSettingsPatch, ZoomState,
};
use bonfire_session::{ManualClock, SessionBackend, SessionError, SessionHub, StoreConfig};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn make_hub() -> (SessionHub, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let hub = SessionHub::with_clock(StoreConfig::default(), Arc::new(clock.clone()));
    (hub, clock)
}

#[tokio::test]
async fn test_remote_write_reaches_viewer_read() {
    let (hub, _) = make_hub();
    let viewer = hub.clone();
    viewer.create_session("room").await.unwrap();

    hub.write_session("room", &SessionPatch::select("activity:101"))
        .await
        .unwrap();
    hub.write_session("room", &SessionPatch::zoom(ZoomState::Cluster))
        .await
        .unwrap();

    let state = viewer.get_session("room").await.unwrap();
    assert_eq!(state.selected_node_id.as_deref(), Some("activity:101"));
    assert_eq!(state.zoom_state, ZoomState::Cluster);
    assert_eq!(state.path, vec!["activity:101".to_string()]);
}

#[tokio::test]
async fn test_patch_merges_view_settings_two_levels() {
    let (hub, _) = make_hub();
    hub.create_session("s").await.unwrap();

    let patch = SessionPatch {
        view_mode: Some(ViewMode::Force),
        view_settings: Some(ViewSettingsPatch {
            cloud: Some(CloudSettingsPatch {
                max_font: Some(80.0),
                ..CloudSettingsPatch::default()
            }),
            ..ViewSettingsPatch::default()
        }),
        ..SessionPatch::default()
    };
    let state = hub.patch_session("s", &patch).await.unwrap();

    assert_eq!(state.view_mode, ViewMode::Force);
    assert!((state.view_settings.cloud.max_font - 80.0).abs() < f64::EPSILON);
    assert!((state.view_settings.cloud.min_font - 14.0).abs() < f64::EPSILON);
    assert!((state.view_settings.force.link_distance - 80.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_clear_selection_keeps_path() {
    let (hub, _) = make_hub();
    hub.write_session("s", &SessionPatch::select("n1").with_highlights(vec!["n2".into()]))
        .await
        .unwrap();
    let state = hub
        .patch_session("s", &SessionPatch::clear_selection())
        .await
        .unwrap();
    assert_eq!(state.selected_node_id, None);
    assert!(state.highlighted_node_ids.is_empty());
    assert_eq!(state.path, vec!["n1".to_string()]);
}

#[tokio::test]
async fn test_expired_session_not_found_then_revived_by_write() {
    let (hub, clock) = make_hub();
    hub.create_session("s").await.unwrap();
    clock.advance(Duration::from_secs(31 * 60));

    assert_eq!(
        hub.get_session("s").await,
        Err(SessionError::SessionNotFound("s".into()))
    );
    assert!(hub
        .patch_session("s", &SessionPatch::auto_play(false))
        .await
        .unwrap_err()
        .is_not_found());

    let revived = hub
        .write_session("s", &SessionPatch::auto_play(false))
        .await
        .unwrap();
    assert!(!revived.auto_play);
    assert_eq!(hub.session_count().await, 1);
}

#[tokio::test]
async fn test_saved_path_round_trip_through_backend() {
    let (hub, _) = make_hub();
    for id in ["n1", "n2", "n3"] {
        hub.write_session("s", &SessionPatch::select(id)).await.unwrap();
    }
    let state = hub.get_session("s").await.unwrap();
    let backend: Arc<dyn SessionBackend> = Arc::new(hub);

    let path_id = backend.save_path("s", state.path.clone()).await.unwrap();
    let saved = backend.get_path(&path_id).await.unwrap();
    assert_eq!(saved.path, state.path);
    assert_eq!(backend.export_path(&path_id).await.unwrap(), "n1\nn2\nn3");
    assert!(matches!(
        backend.get_path("missing").await,
        Err(SessionError::PathNotFound(_))
    ));
}
