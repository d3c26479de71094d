mod support;

use std::sync::Arc;
use story_application::{
    AlertLevel, App, AppEvent, Document, InMemoryDocument, PageState, UiEvent, default_routes,
};
use story_core::bookmark::BookmarkRepository;
use story_core::session::SessionStore;
use support::{ApiCall, Fixture, session, story};
use tempfile::TempDir;

fn app(fixture: &Fixture) -> (App, Arc<InMemoryDocument>) {
    let document = Arc::new(InMemoryDocument::new());
    let routes = default_routes(fixture.services()).unwrap();
    (App::new(routes, document.clone()), document)
}

fn feed() -> Vec<story_core::story::Story> {
    vec![
        story("42", "2024-03-01T10:00:00Z", Some((-6.2, 106.8))),
        story("7", "2024-02-01T10:00:00Z", None),
    ]
}

async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

async fn wait_for_call(fixture: &Fixture, call: &ApiCall) {
    wait_until(|| fixture.api.calls().contains(call)).await;
}

#[tokio::test(start_paused = true)]
async fn test_guest_home_lists_stories_without_bearer() {
    let fixture = Fixture::new(feed());
    let (mut app, document) = app(&fixture);

    let navigation = app.open("#/").await;
    assert!(app.run_until_idle().await);

    assert_eq!(navigation.page, "home");
    assert_eq!(fixture.api.calls(), vec![ApiCall::GetStories { token: None }]);
    assert!(document.markup().contains("Browsing as guest"));
    let list = document.region("story-list").unwrap();
    assert!(list.contains(r##"href="#/story/42""##));
    assert!(list.contains(r##"href="#/story/7""##));
    assert_eq!(app.router().active_state(), PageState::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_empty_feed_shows_empty_message() {
    let fixture = Fixture::new(Vec::new());
    let (mut app, document) = app(&fixture);

    app.open("/").await;
    app.run_until_idle().await;

    assert!(document.region("story-list").unwrap().contains("No stories found"));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_during_pending_detail_fetch() {
    let fixture = Fixture::new(feed());
    let gate = fixture.api.gate_details();
    let (mut app, document) = app(&fixture);

    app.open("/story/42").await;
    wait_for_call(
        &fixture,
        &ApiCall::GetStory {
            token: None,
            id: "42".to_string(),
        },
    )
    .await;
    assert!(document.region("story-detail").unwrap().contains("loading-container"));

    app.handle(AppEvent::Navigate("/".to_string())).await;
    assert_eq!(app.router().state_of("/story/:id"), Some(PageState::Unmounted));

    gate.notify_one();
    app.run_until_idle().await;

    // The late detail response must not touch the home page
    assert_eq!(app.router().active_page(), Some("home"));
    assert!(document.region("story-detail").is_none());
    assert!(document.region("button-container").is_none());
    assert!(document.region("story-list").unwrap().contains("story-item"));
    assert_eq!(fixture.maps.live_count(), 0);
    assert!(document.alerts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_bookmark_save_list_remove() {
    let fixture = Fixture::new(feed());
    let (mut app, document) = app(&fixture);

    app.open("/story/42").await;
    app.run_until_idle().await;
    let detail = document.region("story-detail").unwrap();
    assert!(detail.contains(r#"<div id="button-container"></div>"#));
    assert!(document.region("button-container").unwrap().contains("story-detail-save"));
    assert_eq!(fixture.maps.live_count(), 1);

    app.handle(AppEvent::Ui(UiEvent::click("story-detail-save")))
        .await;
    app.run_until_idle().await;

    assert_eq!(fixture.bookmarks.get_all().await.unwrap().len(), 1);
    assert!(document.region("button-container").unwrap().contains("story-detail-remove"));
    let alerts = document.take_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Success);

    app.handle(AppEvent::Navigate("#/bookmark".to_string())).await;
    app.run_until_idle().await;

    assert_eq!(fixture.maps.live_count(), 1);
    assert!(document.region("bookmark-list").unwrap().contains("Description of 42"));
    assert!(document.region("bookmark-count").unwrap().contains("1 story bookmarked"));

    app.handle(AppEvent::Ui(UiEvent::click_with(
        "bookmark-remove",
        [("id", "42")],
    )))
    .await;
    app.run_until_idle().await;

    assert!(fixture.bookmarks.get_all().await.unwrap().is_empty());
    assert!(document
        .region("bookmark-list")
        .unwrap()
        .contains("No bookmarked stories yet"));

    app.stop().await;
    assert_eq!(fixture.maps.live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_detail_before_map_delay_skips_map() {
    let fixture = Fixture::new(feed());
    let mut config = support::config();
    config.timing.detail_map_delay_ms = 600;
    let document = Arc::new(InMemoryDocument::new());
    let mut app = App::new(
        default_routes(fixture.services_with(config)).unwrap(),
        document.clone(),
    );

    app.open("/story/42").await;
    wait_until(|| {
        document
            .region("story-detail")
            .is_some_and(|detail| detail.contains("Story by"))
    })
    .await;
    app.handle(AppEvent::Navigate("/about".to_string())).await;
    app.run_until_idle().await;

    assert_eq!(app.router().active_page(), Some("about"));
    assert_eq!(fixture.maps.live_count(), 0);
    assert_eq!(fixture.maps.disposed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_login_redirects_home_as_signed_in_user() {
    let fixture = Fixture::new(feed());
    let (mut app, document) = app(&fixture);

    app.open("/login").await;
    app.run_until_idle().await;
    app.navigator().dispatch(UiEvent::submit(
        "login-form",
        [("email", "dimas@example.com"), ("password", "hunter22")],
    ));
    assert!(app.run_until_idle().await);

    assert_eq!(app.router().current(), Some("/"));
    assert_eq!(fixture.session.token().as_deref(), Some("secret-token"));
    assert!(document.markup().contains("Signed in as Dimas"));
    assert!(fixture.api.calls().contains(&ApiCall::GetStories {
        token: Some("secret-token".to_string())
    }));
}

#[tokio::test(start_paused = true)]
async fn test_profile_without_session_redirects_to_login() {
    let fixture = Fixture::new(Vec::new());
    let (mut app, _document) = app(&fixture);

    app.open("/profile").await;
    app.run_until_idle().await;

    assert_eq!(app.router().active_page(), Some("login"));
}

#[tokio::test(start_paused = true)]
async fn test_logout_from_profile() {
    let fixture = Fixture::new(Vec::new());
    fixture.session.set_session(session()).unwrap();
    let (mut app, document) = app(&fixture);

    app.open("/profile").await;
    app.run_until_idle().await;
    assert!(document.region("profile-info").unwrap().contains("Dimas"));

    app.handle(AppEvent::Ui(UiEvent::click("logout-button")))
        .await;
    app.run_until_idle().await;

    assert!(fixture.session.current().is_none());
    assert_eq!(app.router().current(), Some("/"));
    assert!(document.markup().contains("Browsing as guest"));
}

#[tokio::test]
async fn test_guest_story_submission_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pier.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

    let fixture = Fixture::new(Vec::new());
    let (mut app, document) = app(&fixture);

    app.open("/add").await;
    app.run_until_idle().await;
    assert!(document.markup().contains("posted as a guest"));
    assert_eq!(fixture.maps.live_count(), 1);

    let path = path.to_string_lossy().into_owned();
    let navigator = app.navigator();
    navigator.dispatch(UiEvent::click_with("photo-upload", [("path", path.as_str())]));
    navigator.dispatch(UiEvent::click_with(
        "location-map",
        [("lat", "-6.5"), ("lon", "106.75")],
    ));
    app.run_until_idle().await;
    assert!(document.region("snapshot-container").unwrap().contains("pier.jpg"));

    navigator.dispatch(UiEvent::submit(
        "add-story-form",
        [("description", "Sunset at the pier")],
    ));
    app.run_until_idle().await;

    assert!(fixture.api.calls().contains(&ApiCall::AddStory {
        token: None,
        description: "Sunset at the pier".to_string(),
        lat: Some(-6.5),
        lon: Some(106.75),
    }));
    assert_eq!(app.router().current(), Some("/"));
    assert_eq!(fixture.maps.live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_route_shows_not_found() {
    let fixture = Fixture::new(Vec::new());
    let (mut app, document) = app(&fixture);

    let navigation = app.open("#/nowhere").await;

    assert_eq!(navigation.page, "not-found");
    assert!(document.markup().contains("Page Not Found"));
}

#[tokio::test(start_paused = true)]
async fn test_start_runs_until_quit() {
    let fixture = Fixture::new(Vec::new());
    let (mut app, document) = app(&fixture);
    let navigator = app.navigator();

    navigator.go("/about");
    navigator.quit();
    navigator.go("/login");
    app.start("/").await;

    assert!(document.markup().contains("About Story Share"));
    assert_eq!(app.router().active_page(), None);
    assert_eq!(document.mount_count(), 2);
}

async fn deactivate_twice(app: &App, pattern: &str) {
    let table = app.router().table();
    let index = table.position(pattern).unwrap();
    let page = table.routes()[index].page().clone();
    page.deactivate().await.unwrap();
    page.deactivate().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_home_deactivate_twice_releases_map_once() {
    let fixture = Fixture::new(feed());
    let (mut app, _document) = app(&fixture);

    app.open("/").await;
    app.run_until_idle().await;
    app.handle(AppEvent::Ui(UiEvent::click_with(
        "map-toggle-button",
        [("id", "42"), ("lat", "-6.2"), ("lon", "106.8")],
    )))
    .await;
    app.run_until_idle().await;
    assert_eq!(fixture.maps.live_count(), 1);

    deactivate_twice(&app, "/").await;

    assert_eq!(fixture.maps.live_count(), 0);
    assert_eq!(fixture.maps.disposed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_detail_deactivate_twice_releases_map_once() {
    let fixture = Fixture::new(feed());
    let (mut app, _document) = app(&fixture);

    app.open("/story/42").await;
    app.run_until_idle().await;
    assert_eq!(fixture.maps.live_count(), 1);

    deactivate_twice(&app, "/story/:id").await;

    assert_eq!(fixture.maps.live_count(), 0);
    assert_eq!(fixture.maps.disposed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_add_story_deactivate_twice_releases_map_once() {
    let fixture = Fixture::new(Vec::new());
    let (mut app, _document) = app(&fixture);

    app.open("/add").await;
    app.run_until_idle().await;
    assert_eq!(fixture.maps.live_count(), 1);

    deactivate_twice(&app, "/add").await;

    assert_eq!(fixture.maps.live_count(), 0);
    assert_eq!(fixture.maps.disposed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_profile_offers_test_notification_while_subscribed() {
    let fixture = Fixture::new(Vec::new());
    fixture.session.set_session(session()).unwrap();
    fixture
        .push
        .subscribed
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let (mut app, document) = app(&fixture);

    app.open("/profile").await;
    app.run_until_idle().await;
    assert!(document
        .region("test-notification")
        .unwrap()
        .contains("Test Notification"));

    app.handle(AppEvent::Ui(UiEvent::click("test-notification")))
        .await;
    app.run_until_idle().await;

    let alerts = document.take_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Info);
    assert_eq!(alerts[0].message, "Test notification sent!");
    assert_eq!(fixture.push.shown.lock().unwrap().len(), 1);

    // Unsubscribing hides the button again
    app.handle(AppEvent::Ui(UiEvent::click("toggle-notifications")))
        .await;
    app.run_until_idle().await;
    assert_eq!(document.region("test-notification").as_deref(), Some(""));
}
