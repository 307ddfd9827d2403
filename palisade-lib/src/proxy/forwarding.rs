use http::HeaderValue;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::proxy::http_result::{HttpError, HttpResult};
use crate::proxy::synthetic::RespBody;

pub type HttpClient = Client<HttpConnector, Incoming>;

pub(crate) fn create_client(timeout: &TimeoutConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_millis(timeout.connect_ms)));
    if timeout.keep_alive.enabled {
        connector.set_keepalive(Some(Duration::from_secs(timeout.keep_alive.timeout_secs)));
    } else {
        connector.set_keepalive(None);
    }

    Client::builder(TokioExecutor::new()).build(connector)
}

/// Forward an allowed request to the upstream origin
///
/// The request keeps its path and query; authority and Host are rewritten
/// to the upstream address. The response body is streamed, not buffered.
pub(crate) async fn forward(
    mut req: Request<Incoming>,
    upstream: &str,
    client: &HttpClient,
) -> HttpResult<Response<RespBody>> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let uri: http::Uri = format!("http://{upstream}{path_and_query}")
        .parse()
        .map_err(|e| HttpError::InvalidUri(format!("Upstream URI: {e}")))?;
    *req.uri_mut() = uri;

    let host = HeaderValue::from_str(upstream)
        .map_err(|e| HttpError::InvalidUri(format!("Upstream host header: {e}")))?;
    req.headers_mut().insert(http::header::HOST, host);

    let resp = client
        .request(req)
        .await
        .map_err(|e| HttpError::UpstreamUnreachable(e.to_string()))?;

    Ok(resp.map(|body| body.boxed()))
}
