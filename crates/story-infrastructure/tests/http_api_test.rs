use std::sync::Arc;
use story_core::api::StoryApi;
use story_core::config::ApiSettings;
use story_core::session::Credentials;
use story_core::story::{Envelope, NewStory, Photo, StoryQuery};
use story_infrastructure::HttpStoryApi;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A one-connection-at-a-time HTTP server answering every request with
/// the same status and JSON body, recording raw requests.
struct FakeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    async fn start(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let raw = read_request(&mut socket).await;
                recorded.lock().await.push(raw);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            requests,
        }
    }

    fn api(&self) -> HttpStoryApi {
        HttpStoryApi::new(&ApiSettings {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    async fn last_request(&self) -> String {
        self.requests.lock().await.last().cloned().unwrap_or_default()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&buffer).into_owned();
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = head.contains("transfer-encoding: chunked");

    loop {
        let body = &buffer[header_end..];
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => find(body, b"0\r\n\r\n").is_some(),
            None => true,
        };
        if complete {
            break;
        }
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn photo() -> Photo {
    Photo {
        file_name: "snapshot.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

#[tokio::test]
async fn test_guest_story_list_sends_no_authorization() {
    let server = FakeServer::start(
        "200 OK",
        r#"{"error":false,"message":"Stories fetched successfully","listStory":[
            {"id":"story-1","name":"Dimas","description":"Hi","photoUrl":"https://example.com/1.jpg","createdAt":"2022-01-08T06:34:18.598Z","lat":-6.2,"lon":106.8}
        ]}"#,
    )
    .await;

    let envelope = server
        .api()
        .get_stories(None, &StoryQuery::with_location())
        .await
        .unwrap();

    let stories = envelope.into_result().unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].id, "story-1");

    let request = server.last_request().await;
    assert!(request.starts_with("GET /v1/stories?location=1 "));
    assert!(!request.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_authenticated_detail_sends_bearer() {
    let server = FakeServer::start(
        "200 OK",
        r#"{"error":false,"message":"Story fetched successfully","story":
            {"id":"story-42","name":"Ayu","description":"Beach","photoUrl":"https://example.com/42.jpg","createdAt":"2022-01-08T06:34:18.598Z"}
        }"#,
    )
    .await;

    let story = server
        .api()
        .get_story(Some("secret-token"), "story-42")
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(story.name, "Ayu");
    assert!(!story.has_location());
    let request = server.last_request().await;
    assert!(request.starts_with("GET /v1/stories/story-42 "));
    assert!(request.contains("authorization: Bearer secret-token") || request.contains("Authorization: Bearer secret-token"));
}

#[tokio::test]
async fn test_error_status_decodes_failure_envelope() {
    let server = FakeServer::start("401 Unauthorized", r#"{"error":true,"message":"Invalid password"}"#).await;

    let envelope = server
        .api()
        .login(&Credentials {
            email: "dimas@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(envelope, Envelope::failure("Invalid password"));
    let request = server.last_request().await;
    assert!(request.starts_with("POST /v1/login "));
    assert!(request.contains(r#""email":"dimas@example.com""#));
}

#[tokio::test]
async fn test_undecodable_body_is_transport_fault() {
    let server = FakeServer::start("502 Bad Gateway", "<html>bad gateway</html>").await;

    let err = server
        .api()
        .get_stories(None, &StoryQuery::default())
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_guest_submission_uses_guest_endpoint_and_lat_field() {
    let server = FakeServer::start("201 Created", r#"{"error":false,"message":"success"}"#).await;
    let story = NewStory {
        description: "Sunset".to_string(),
        photo: photo(),
        lat: Some(-6.5),
        lon: Some(106.75),
    };

    let envelope = server.api().add_story(None, &story).await.unwrap();
    assert!(!envelope.is_error());

    let request = server.last_request().await;
    assert!(request.starts_with("POST /v1/stories/guest "));
    assert!(request.contains("name=\"description\""));
    assert!(request.contains("name=\"photo\"; filename=\"snapshot.jpg\""));
    assert!(request.contains("name=\"lat\"\r\n\r\n-6.5"));
    assert!(request.contains("name=\"lon\"\r\n\r\n106.75"));
    assert!(!request.contains("name=\"len\""));
}

#[tokio::test]
async fn test_authenticated_submission_uses_stories_endpoint() {
    let server = FakeServer::start("201 Created", r#"{"error":false,"message":"success"}"#).await;
    let story = NewStory::new("No location", photo());

    server.api().add_story(Some("tkn"), &story).await.unwrap();

    let request = server.last_request().await;
    assert!(request.starts_with("POST /v1/stories "));
    assert!(!request.contains("name=\"lat\""));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_fault() {
    // Bind then drop to obtain a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpStoryApi::new(&ApiSettings {
        base_url: format!("http://{}/v1", addr),
        timeout_secs: 2,
    })
    .unwrap();

    let err = api.get_story(None, "story-1").await.unwrap_err();
    assert!(err.is_transport());
}
