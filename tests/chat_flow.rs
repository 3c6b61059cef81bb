//! End-to-end flows through `App` against a mock chat service

use parley::{App, Config, KeyValueStore, Member, Navigation, Route};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config_for(server: &MockServer, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.storage.data_dir = data_dir.to_string_lossy().to_string();
    config
}

fn message_json(id: i64, author: &str, text: &str) -> serde_json::Value {
    json!({
        "id": id,
        "author_username": author,
        "text": text,
        "created_at": "2024-01-01T12:00:00Z"
    })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "a", "password": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "member": {"id": 1, "username": "a"}
        })))
        .mount(server)
        .await;
}

async fn sign_in(app: &App) {
    let mut form = app.login_form();
    form.username = "a".to_string();
    form.password = "b".to_string();
    assert_eq!(form.submit().await, Some(Route::Home));
}

#[tokio::test]
async fn test_login_chat_logout() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/chat/messages"))
        .and(query_param("limit", "50"))
        .and(header("Authorization", "Token T1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([message_json(1, "b", "hi")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat/messages"))
        .and(header("Authorization", "Token T1"))
        .and(body_json(json!({"text": "hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(message_json(2, "a", "hello")))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(config_for(&server, dir.path())).unwrap();
    assert_eq!(app.navigate("/"), Navigation::Redirect(Route::Login));

    sign_in(&app).await;
    assert_eq!(app.navigate("/login"), Navigation::Redirect(Route::Home));
    assert_eq!(app.session().member(), Some(Member::new(1, "a")));

    let chat = app.chat_view();
    chat.mount().await;
    chat.send(" hello ").await;

    let texts: Vec<String> = chat.state().messages.into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["hello", "hi"]);

    // A second client over the same data directory picks the session up
    let reopened = App::new(config_for(&server, dir.path())).unwrap();
    assert_eq!(reopened.session().token().as_deref(), Some("T1"));
    assert_eq!(reopened.session().member(), Some(Member::new(1, "a")));

    assert_eq!(chat.logout(), Route::Login);
    assert!(!app.session().is_authenticated());
    assert_eq!(app.storage().get_item("auth_token").unwrap(), None);
    assert_eq!(app.storage().get_item("auth_member").unwrap(), None);
    assert_eq!(app.navigate("/"), Navigation::Redirect(Route::Login));

    let reopened = App::new(config_for(&server, dir.path())).unwrap();
    assert!(!reopened.session().is_authenticated());
}

#[tokio::test]
async fn test_requests_without_session_carry_no_header() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Authentication credentials were not provided."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(config_for(&server, dir.path())).unwrap();
    let view = app.profile_view();
    view.load().await;

    assert_eq!(
        view.state().error.as_deref(),
        Some("Failed to load the profile.")
    );
}

#[tokio::test]
async fn test_polling_replaces_messages() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/chat/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([message_json(1, "b", "first")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/chat/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            message_json(2, "c", "second"),
            message_json(1, "b", "first")
        ])))
        .mount(&server)
        .await;

    let mut config = config_for(&server, dir.path());
    config.chat.poll_interval_secs = 1;
    let app = App::new(config).unwrap();
    sign_in(&app).await;

    let chat = app.chat_view();
    chat.mount().await;
    assert_eq!(chat.state().messages.len(), 1);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let texts: Vec<String> = chat.state().messages.into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["second", "first"]);

    chat.unmount();
    let polled = fetches(&server).await;

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(fetches(&server).await, polled);
}

async fn fetches(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/api/chat/messages")
        .count()
}

#[tokio::test]
async fn test_server_error_messages() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Unable to log in with provided credentials."})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"username": ["A user with that username already exists."]})),
        )
        .mount(&server)
        .await;

    let app = App::new(config_for(&server, dir.path())).unwrap();

    let mut login = app.login_form();
    login.username = "a".to_string();
    login.password = "wrong".to_string();
    assert_eq!(login.submit().await, None);
    assert_eq!(
        login.error(),
        Some("Unable to log in with provided credentials.")
    );

    let mut register = app.register_form();
    register.username = "a".to_string();
    register.password = "pw".to_string();
    register.confirm_password = "pw".to_string();
    assert_eq!(register.submit().await, None);
    assert_eq!(
        register.error(),
        Some("A user with that username already exists.")
    );

    assert!(!app.session().is_authenticated());
    assert_eq!(app.storage().get_item("auth_token").unwrap(), None);
}

#[tokio::test]
async fn test_rename_updates_persisted_member() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Token T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "a", "created_at": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Token T1"))
        .and(body_json(json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "created_at": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(config_for(&server, dir.path())).unwrap();
    sign_in(&app).await;

    let view = app.profile_view();
    view.load().await;
    view.set_username("alice");
    view.save().await;
    assert_eq!(view.state().success.as_deref(), Some("Profile saved."));

    let reopened = App::new(config_for(&server, dir.path())).unwrap();
    assert_eq!(reopened.session().member(), Some(Member::new(1, "alice")));
    assert_eq!(reopened.session().token().as_deref(), Some("T1"));
}
