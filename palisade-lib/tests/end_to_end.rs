//! Live pipeline tests: a scratch HTML-serving upstream behind the proxy.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};

use palisade_lib::config::{Config, ConfigStore, GateConfig, Upstream};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const UPSTREAM_HTML: &str = concat!(
    "<html>\n<head>\n",
    "<meta charset=\"utf-8\">\n",
    "<link rel=\"stylesheet\" href=\"/style.css\">\n",
    "<link rel=\"alternate\" type=\"application/rss+xml\" href=\"/feed/\">\n",
    "<link rel=\"shortlink\" href=\"/?p=1\">\n",
    "<meta name=\"generator\" content=\"WordPress 6.4\">\n",
    "<link rel=\"https://api.w.org/\" href=\"/wp-json/\">\n",
    "</head>\n<body><p>front page</p></body>\n</html>\n",
);

/// Upstream origin: answers every request with a fingerprint-heavy HTML
/// page and echoes request details back in x-echo-* headers.
async fn spawn_upstream() -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let svc = hyper::service::service_fn(|req: Request<Incoming>| async move {
                    let revisions = req
                        .headers()
                        .get("x-palisade-max-revisions")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("missing")
                        .to_string();
                    let file_edit = req
                        .headers()
                        .get("x-palisade-file-edit")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("missing")
                        .to_string();

                    Response::builder()
                        .status(200)
                        .header("content-type", "text/html; charset=UTF-8")
                        .header("x-powered-by", "PHP/8.2.7")
                        .header("server", "Apache/2.4.57 (Debian)")
                        .header("x-pingback", "http://origin/xmlrpc.php")
                        .header(
                            "link",
                            "<http://origin/wp-json/>; rel=\"https://api.w.org/\"",
                        )
                        .header("x-echo-path", req.uri().path())
                        .header("x-echo-revisions", revisions)
                        .header("x-echo-file-edit", file_edit)
                        .body(Full::new(Bytes::from_static(UPSTREAM_HTML.as_bytes())))
                });
                let _ = ConnBuilder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    Ok(addr)
}

fn free_port() -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Proxy configured like a deployment whose edge strips `x-authenticated`
/// from client traffic before it reaches us.
async fn spawn_proxy(
    upstream: SocketAddr,
) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let gate = GateConfig {
        trusted_auth_header: "x-authenticated".to_string(),
        ..GateConfig::default()
    };
    spawn_proxy_with_gate(upstream, gate).await
}

async fn spawn_proxy_with_gate(
    upstream: SocketAddr,
    gate: GateConfig,
) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let listen: SocketAddr = format!("127.0.0.1:{}", free_port()?).parse()?;
    let cfg = Config {
        listen,
        upstream: Upstream { address: format!("127.0.0.1:{}", upstream.port()) },
        gate,
        sanitize: Default::default(),
        site: Default::default(),
        logging: Default::default(),
        timeout: Default::default(),
    };

    let store = Arc::new(ConfigStore::new());
    store.load(cfg.site.clone())?;
    tokio::spawn(palisade_lib::run(Arc::new(cfg), store));

    // Wait for the listener to come up
    for _ in 0..50 {
        if TcpStream::connect(listen).await.is_ok() {
            return Ok(listen);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err("proxy did not start listening".into())
}

fn client() -> Result<reqwest::Client, Box<dyn std::error::Error + Send + Sync>> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

#[tokio::test]
async fn xmlrpc_is_denied_for_every_caller() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client
        .get(format!("http://{proxy}/xmlrpc.php"))
        .send()
        .await?;
    assert_eq!(resp.status(), 403);

    let resp = client
        .get(format!("http://{proxy}/xmlrpc.php"))
        .header("x-authenticated", "1")
        .send()
        .await?;
    assert_eq!(resp.status(), 403);

    Ok(())
}

#[tokio::test]
async fn feed_routes_get_the_fixed_disabled_page() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client.get(format!("http://{proxy}/feed/")).send().await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await?, "Feed has been disabled.");

    // Authenticated callers reach the upstream
    let resp = client
        .get(format!("http://{proxy}/feed/"))
        .header("x-authenticated", "1")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("x-echo-path").map(|v| v.as_bytes()),
        Some("/feed/".as_bytes())
    );

    Ok(())
}

#[tokio::test]
async fn core_rest_requires_authentication() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let url = format!("http://{proxy}/wp-json/wp/v2/posts");

    let resp = client.get(&url).send().await?;
    assert_eq!(resp.status(), 401);
    assert_eq!(resp.text().await?, "You are not currently logged in.");

    let resp = client.get(&url).header("x-authenticated", "1").send().await?;
    assert_eq!(resp.status(), 200);

    // Session cookie counts as authentication too
    let resp = client
        .get(&url)
        .header("cookie", "wordpress_logged_in_abc=admin%7C12345")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    // Plugin namespaces stay open
    let resp = client
        .get(format!("http://{proxy}/wp-json/myplugin/v1/items"))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    Ok(())
}

#[tokio::test]
async fn forged_auth_header_is_ignored_by_default() -> TestResult {
    let upstream = spawn_upstream().await?;
    // No trusted_auth_header configured: cookies are the only auth signal,
    // so a client-supplied x-authenticated header must not open anything.
    let proxy = spawn_proxy_with_gate(upstream, GateConfig::default()).await?;
    let client = client()?;

    let resp = client
        .get(format!("http://{proxy}/wp-json/wp/v2/users"))
        .header("x-authenticated", "1")
        .send()
        .await?;
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!("http://{proxy}/feed/"))
        .header("x-authenticated", "true")
        .send()
        .await?;
    assert_eq!(resp.text().await?, "Feed has been disabled.");

    Ok(())
}

#[tokio::test]
async fn allowed_pages_are_sanitized_and_trimmed() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client.get(format!("http://{proxy}/")).send().await?;
    assert_eq!(resp.status(), 200);

    // Fingerprint headers are gone, content headers survive
    assert!(resp.headers().get("x-powered-by").is_none());
    assert!(resp.headers().get("server").is_none());
    assert!(resp.headers().get("x-pingback").is_none());
    assert!(resp.headers().get("link").is_none());
    assert!(resp.headers().get("content-type").is_some());

    let body = resp.text().await?;
    assert!(body.contains("front page"));
    assert!(body.contains("stylesheet"));
    assert!(!body.contains("rss+xml"));
    assert!(!body.contains("shortlink"));
    assert!(!body.contains("generator"));
    assert!(!body.contains("api.w.org"));

    Ok(())
}

#[tokio::test]
async fn head_requests_keep_the_upstream_content_length() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client.head(format!("http://{proxy}/")).send().await?;
    assert_eq!(resp.status(), 200);
    // Header sanitization still applies, but the bodyless response must
    // keep the length the upstream advertised for the full page.
    assert!(resp.headers().get("x-powered-by").is_none());
    let len = resp
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .ok_or("content-length missing from HEAD response")?;
    assert_eq!(len, UPSTREAM_HTML.len().to_string());

    Ok(())
}

#[tokio::test]
async fn site_policies_are_advertised_to_the_upstream() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client.get(format!("http://{proxy}/about/")).send().await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("x-echo-revisions").map(|v| v.as_bytes()),
        Some("5".as_bytes())
    );
    assert_eq!(
        resp.headers().get("x-echo-file-edit").map(|v| v.as_bytes()),
        Some("deny".as_bytes())
    );

    Ok(())
}

#[tokio::test]
async fn plain_http_admin_traffic_is_redirected() -> TestResult {
    let upstream = spawn_upstream().await?;
    let proxy = spawn_proxy(upstream).await?;
    let client = client()?;

    let resp = client
        .get(format!("http://{proxy}/wp-admin/options.php"))
        .send()
        .await?;
    assert_eq!(resp.status(), 301);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some(format!("https://{proxy}/wp-admin/options.php").as_str())
    );

    // Terminated-TLS traffic (x-forwarded-proto: https) passes through
    let resp = client
        .get(format!("http://{proxy}/wp-admin/options.php"))
        .header("x-forwarded-proto", "https")
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    Ok(())
}
