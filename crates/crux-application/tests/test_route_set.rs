use chrono::{TimeZone, Utc};
use crux_application::{RouteSetManager, ToggleOutcome};
use crux_core::route::RouteInfo;
use crux_core::user::{LocalPreferenceStore, RouteCollection, UserDataStore};
use crux_infrastructure::{
    ChannelMilestoneNotifier, InMemoryUserDataStore, JsonDirUserDataStore, MilestoneNotification,
    TomlPreferenceStore,
};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

struct Harness {
    _temp_dir: TempDir,
    store: Arc<InMemoryUserDataStore>,
    preferences: Arc<TomlPreferenceStore>,
    notifications: mpsc::UnboundedReceiver<MilestoneNotification>,
    manager: RouteSetManager,
}

fn harness() -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryUserDataStore::new());
    let preferences = Arc::new(TomlPreferenceStore::with_path(
        temp_dir.path().join("preferences.toml"),
    ));
    let (notifier, notifications) = ChannelMilestoneNotifier::channel();
    let manager = RouteSetManager::new(store.clone(), preferences.clone(), Arc::new(notifier));

    Harness {
        _temp_dir: temp_dir,
        store,
        preferences,
        notifications,
        manager,
    }
}

fn route(id: &str, name: &str) -> RouteInfo {
    RouteInfo::new(id, name)
        .with_grade("5.10a")
        .with_type("sport")
        .with_area("Oregon", "Smith Rock")
        .with_rating(3.5, 12)
}

fn ids(routes: &[RouteInfo]) -> Vec<String> {
    routes.iter().map(|r| r.id.clone()).collect()
}

fn assert_no_duplicates(routes: &[RouteInfo]) {
    let unique: HashSet<&str> = routes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        unique.len(),
        routes.len(),
        "duplicate ids in {:?}",
        ids(routes)
    );
}

#[tokio::test]
async fn test_load_orders_most_recent_first() {
    let h = harness();
    let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
    h.store
        .seed_route("u1", RouteCollection::Ticks, &route("b", "B"), t1)
        .await;
    h.store
        .seed_route("u1", RouteCollection::Ticks, &route("a", "A"), t2)
        .await;

    h.manager.on_session_start("u1").await.unwrap();

    assert_eq!(ids(&h.manager.ticked_routes()), vec!["a", "b"]);
    let loaded = &h.manager.ticked_routes()[0];
    assert_eq!(loaded.grade, "5.10a");
    assert_eq!(loaded.parent_sector, "Smith Rock");
    assert_eq!(loaded.num_votes, 12);
    assert!(loaded.safety.is_none());
}

#[tokio::test]
async fn test_bookmark_toggle_on_empty_collection() {
    let h = harness();
    h.manager.on_session_start("u1").await.unwrap();
    let x = route("x", "X Marks the Spot");

    assert_eq!(
        h.manager.toggle_bookmark(&x).await.unwrap(),
        ToggleOutcome::Added
    );
    assert_eq!(ids(&h.manager.bookmarked_routes()), vec!["x"]);
    assert!(h.manager.is_bookmarked("x"));

    assert_eq!(
        h.manager.toggle_bookmark(&x).await.unwrap(),
        ToggleOutcome::Removed
    );
    assert!(h.manager.bookmarked_routes().is_empty());
    assert!(
        h.store
            .list_routes("u1", RouteCollection::Bookmarks)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_ticks_and_bookmarks_are_independent() {
    let h = harness();
    h.manager.on_session_start("u1").await.unwrap();
    let r = route("r1", "Route One");

    h.manager.toggle_tick(&r).await.unwrap();
    h.manager.toggle_bookmark(&r).await.unwrap();
    h.manager.toggle_tick(&r).await.unwrap();

    assert!(!h.manager.is_ticked("r1"));
    assert!(h.manager.is_bookmarked("r1"));
}

#[tokio::test]
async fn test_collections_never_hold_duplicates() {
    let h = harness();
    h.manager.on_session_start("u1").await.unwrap();
    let routes: Vec<RouteInfo> = (0..4).map(|i| route(&i.to_string(), "R")).collect();

    for step in 0..20 {
        let r = &routes[step % routes.len()];
        h.manager.toggle_tick(r).await.unwrap();
        if step % 3 == 0 {
            h.manager.toggle_bookmark(r).await.unwrap();
        }
        assert_no_duplicates(&h.manager.ticked_routes());
        assert_no_duplicates(&h.manager.bookmarked_routes());
    }

    h.manager.refresh().await.unwrap();
    assert_no_duplicates(&h.manager.ticked_routes());
}

#[tokio::test]
async fn test_toggle_without_session_changes_nothing() {
    let h = harness();

    let err = h.manager.toggle_tick(&route("r1", "R")).await.unwrap_err();

    assert!(err.is_not_authenticated());
    assert!(h.manager.ticked_routes().is_empty());
    assert!(h.store.is_user_empty("u1").await);
}

#[tokio::test]
async fn test_fifth_tick_sends_one_notification() {
    let mut h = harness();
    for i in 1..=4 {
        h.store
            .seed_route(
                "u1",
                RouteCollection::Ticks,
                &route(&i.to_string(), "R"),
                Utc.with_ymd_and_hms(2025, 1, i, 0, 0, 0).unwrap(),
            )
            .await;
    }
    h.manager.on_session_start("u1").await.unwrap();

    h.manager.toggle_tick(&route("5", "Five")).await.unwrap();
    h.manager.toggle_tick(&route("6", "Six")).await.unwrap();
    h.manager.toggle_tick(&route("6", "Six")).await.unwrap();

    let sent = h.notifications.try_recv().unwrap();
    assert_eq!(sent.count, 5);
    assert_eq!(sent.body, "You've completed 5 climbs.");
    assert!(h.notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_delete_all_user_data_empties_store() {
    let h = harness();
    h.manager.on_session_start("u1").await.unwrap();
    h.manager.toggle_tick(&route("a", "A")).await.unwrap();
    h.manager.toggle_bookmark(&route("b", "B")).await.unwrap();
    h.manager.set_dark_mode(true).await.unwrap();

    h.manager.delete_all_user_data().await.unwrap();

    assert!(h.store.is_user_empty("u1").await);
    assert!(h.manager.user_id().is_none());
    assert!(h.manager.ticked_routes().is_empty());
    assert!(h.manager.bookmarked_routes().is_empty());
}

#[tokio::test]
async fn test_theme_follows_user_across_sessions() {
    let h = harness();
    h.manager.on_session_start("u1").await.unwrap();
    h.manager.set_dark_mode(true).await.unwrap();
    assert!(h.preferences.load().unwrap().is_dark_mode);

    h.manager.on_session_end();
    assert!(!h.manager.is_dark_mode());
    assert!(!h.preferences.load().unwrap().is_dark_mode);

    h.manager.on_session_start("u1").await.unwrap();
    assert!(h.manager.is_dark_mode());
    assert!(h.preferences.load().unwrap().is_dark_mode);
}

#[tokio::test]
async fn test_json_dir_store_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = temp_dir.path().join("store");
    let prefs_path = temp_dir.path().join("preferences.toml");

    {
        let store = Arc::new(JsonDirUserDataStore::new(&store_dir).await.unwrap());
        let (notifier, _rx) = ChannelMilestoneNotifier::channel();
        let manager = RouteSetManager::new(
            store,
            Arc::new(TomlPreferenceStore::with_path(prefs_path.clone())),
            Arc::new(notifier),
        );
        manager.on_session_start("u1").await.unwrap();
        manager.toggle_tick(&route("old", "Old")).await.unwrap();
        manager.toggle_tick(&route("new", "New")).await.unwrap();
        manager.toggle_bookmark(&route("b", "B")).await.unwrap();
    }

    let store = Arc::new(JsonDirUserDataStore::new(&store_dir).await.unwrap());
    let (notifier, _rx) = ChannelMilestoneNotifier::channel();
    let manager = RouteSetManager::new(
        store,
        Arc::new(TomlPreferenceStore::with_path(prefs_path)),
        Arc::new(notifier),
    );
    manager.on_session_start("u1").await.unwrap();

    assert_eq!(ids(&manager.ticked_routes()), vec!["new", "old"]);
    assert_eq!(ids(&manager.bookmarked_routes()), vec!["b"]);
    assert_eq!(manager.ticked_routes()[0].state, "Oregon");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_racing_toggles_on_one_route_alternate() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryUserDataStore::new());
    let preferences = Arc::new(TomlPreferenceStore::with_path(
        temp_dir.path().join("preferences.toml"),
    ));
    let (notifier, _notifications) = ChannelMilestoneNotifier::channel();
    let manager = Arc::new(RouteSetManager::new(
        store.clone(),
        preferences,
        Arc::new(notifier),
    ));
    manager.on_session_start("u1").await.unwrap();
    let target = route("105", "Petrified");

    let mut handles = Vec::new();
    for _ in 0..400 {
        let manager = manager.clone();
        let target = target.clone();
        handles.push(tokio::spawn(async move {
            manager.toggle_tick(&target).await.unwrap()
        }));
    }

    let mut added = 0i64;
    let mut removed = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            ToggleOutcome::Added => added += 1,
            ToggleOutcome::Removed => removed += 1,
            ToggleOutcome::InFlight => {}
            ToggleOutcome::Stale => panic!("session never changed"),
        }
    }

    let net = added - removed;
    assert!(net == 0 || net == 1, "added={added} removed={removed}");
    assert_eq!(manager.is_ticked("105"), net == 1);
    let remote = store.list_routes("u1", RouteCollection::Ticks).await.unwrap();
    assert_eq!(remote.len() as i64, net);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_first_toggles_for_new_user_on_disk_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(
        JsonDirUserDataStore::new(&temp_dir.path().join("store"))
            .await
            .unwrap(),
    );
    let preferences = Arc::new(TomlPreferenceStore::with_path(
        temp_dir.path().join("preferences.toml"),
    ));
    let (notifier, _notifications) = ChannelMilestoneNotifier::channel();
    let manager = Arc::new(RouteSetManager::new(
        store.clone(),
        preferences,
        Arc::new(notifier),
    ));
    manager.on_session_start("new-user").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            let target = route(&format!("r{i}"), "Route");
            if i % 2 == 0 {
                manager.toggle_tick(&target).await
            } else {
                manager.toggle_bookmark(&target).await
            }
        }));
    }
    let theme = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.set_dark_mode(true).await })
    };

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), ToggleOutcome::Added);
    }
    theme.await.unwrap().unwrap();

    assert_eq!(manager.ticked_count(), 4);
    assert_eq!(manager.bookmarked_routes().len(), 4);
    assert!(store.has_user_document("new-user").await.unwrap());
}
