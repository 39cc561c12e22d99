use cellsmith_cloud::{AuthProvider, SupabaseAuth};
use cellsmith_core::{CellsmithError, Settings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Serve exactly one HTTP request with a canned response, returning the raw request text.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

#[tokio::test]
async fn test_otp_request_shape() {
    let (url, server) = serve_once("HTTP/1.1 200 OK", "{}").await;
    let auth = SupabaseAuth::new(url, "anon-key")
        .with_client(local_client())
        .with_redirect("https://cellsmith.app/auth/callback");

    auth.request_sign_in_link("ana@example.com").await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with(
        "POST /auth/v1/otp?redirect_to=https%3A%2F%2Fcellsmith.app%2Fauth%2Fcallback HTTP/1.1"
    ));
    let lower = request.to_lowercase();
    assert!(lower.contains("apikey: anon-key"));
    assert!(lower.contains("authorization: bearer anon-key"));
    assert!(request.contains(r#""email":"ana@example.com""#));
    assert!(request.contains(r#""create_user":true"#));
}

#[tokio::test]
async fn test_error_body_becomes_failure_message() {
    let (url, server) = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        r#"{"code":429,"error_code":"over_email_send_rate_limit","msg":"Email rate limit exceeded"}"#,
    )
    .await;
    let auth = SupabaseAuth::new(url, "anon-key").with_client(local_client());

    let failure = auth
        .request_sign_in_link("ana@example.com")
        .await
        .unwrap_err();
    assert_eq!(failure.message, "Email rate limit exceeded");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /auth/v1/otp HTTP/1.1"));
}

#[tokio::test]
async fn test_unreachable_server_is_failure_not_panic() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let auth = SupabaseAuth::new(format!("http://{addr}"), "anon-key").with_client(local_client());
    let failure = auth
        .request_sign_in_link("ana@example.com")
        .await
        .unwrap_err();
    assert!(!failure.message.is_empty());
}

#[test]
fn test_from_settings_requires_anon_key() {
    let mut settings = Settings::default();
    settings.auth.anon_key_env = "CELLSMITH_TEST_MISSING_ANON_KEY".to_string();

    let err = SupabaseAuth::from_settings(&settings).err().unwrap();
    assert!(matches!(err, CellsmithError::Config(ref m) if m.contains("CELLSMITH_TEST_MISSING_ANON_KEY")));
}

#[test]
fn test_from_settings_with_key() {
    let mut settings = Settings::default();
    settings.auth.anon_key_env = "CELLSMITH_TEST_PRESENT_ANON_KEY".to_string();
    std::env::set_var("CELLSMITH_TEST_PRESENT_ANON_KEY", "anon-xyz");

    assert!(SupabaseAuth::from_settings(&settings).is_ok());
    std::env::remove_var("CELLSMITH_TEST_PRESENT_ANON_KEY");
}
