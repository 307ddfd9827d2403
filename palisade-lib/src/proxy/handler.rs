use http::{HeaderMap, HeaderValue};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::policy::Decision;
use crate::proxy::context::{EngineContext, RequestContext};
use crate::proxy::forwarding::forward;
use crate::proxy::http_result::{HttpError, HttpResult};
use crate::proxy::synthetic::{deny_response, full_body, redirect_response, RespBody};
use crate::sanitize::{apply_directives, trim_head};

/// Run one request through the hardening pipeline: admin-SSL redirect,
/// endpoint gate, upstream forward, then response sanitization.
pub(crate) async fn handle_request(
    mut req: Request<Incoming>,
    ctx: Arc<EngineContext>,
    peer: SocketAddr,
) -> HttpResult<Response<RespBody>> {
    let rctx = RequestContext::from_request(&req, &ctx.config.gate);
    let site = ctx
        .store
        .get()
        .map_err(|_| HttpError::SiteConfigUnavailable)?;

    if site.debug_mode {
        debug!(
            ?peer,
            path = %rctx.path,
            authenticated = rctx.is_authenticated,
            "inbound request"
        );
    }

    if site.force_ssl_admin && is_admin_path(&rctx.path) && !came_in_over_https(req.headers()) {
        if let Some(location) = https_location(&req) {
            info!(?peer, path = %rctx.path, "redirecting plain-HTTP admin request");
            return redirect_response(&location);
        }
    }

    if let Decision::Deny(reason) = ctx.gate.decide(&rctx.path, rctx.is_authenticated) {
        info!(?peer, path = %rctx.path, ?reason, "request denied");
        return deny_response(&reason);
    }

    advertise_site_policies(req.headers_mut(), &site);

    let is_head = req.method() == http::Method::HEAD;
    let mut resp = forward(req, &ctx.config.upstream.address, &ctx.client).await?;

    apply_directives(resp.headers_mut(), &ctx.directives);

    // HEAD responses have no body to rewrite; rebuilding one would
    // clobber the upstream's Content-Length with zero.
    if !is_head && ctx.config.sanitize.trim_markup && is_html(resp.headers()) {
        resp = trim_html_response(resp).await?;
    }

    Ok(resp)
}

/// Tell the upstream which site policies are in force. The upstream is a
/// trusted collaborator; these are advisory request headers it can honor
/// without its own policy store.
fn advertise_site_policies(headers: &mut HeaderMap, site: &SiteConfig) {
    if let Ok(hv) = HeaderValue::from_str(&site.max_revisions.to_string()) {
        headers.insert("x-palisade-max-revisions", hv);
    }
    let lock = |flag: bool| HeaderValue::from_static(if flag { "deny" } else { "allow" });
    headers.insert("x-palisade-file-edit", lock(site.disallow_file_edit));
    headers.insert("x-palisade-file-mods", lock(site.disallow_file_mods));
}

fn is_admin_path(path: &str) -> bool {
    path == "/wp-login.php" || path == "/wp-admin" || path.starts_with("/wp-admin/")
}

fn came_in_over_https(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

fn https_location<B>(req: &Request<B>) -> Option<String> {
    let host = req
        .headers()
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))?;
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Some(format!("https://{host}{path_and_query}"))
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false)
}

/// Buffer an HTML response, trim its head section, and rebuild it with a
/// corrected Content-Length. Non-UTF-8 bodies pass through unchanged.
async fn trim_html_response(resp: Response<RespBody>) -> HttpResult<Response<RespBody>> {
    let (mut parts, body) = resp.into_parts();

    let bytes = body
        .collect()
        .await
        .map_err(|e| HttpError::ResponseRebuild(format!("Failed to read upstream body: {e}")))?
        .to_bytes();

    let out: Vec<u8> = match std::str::from_utf8(&bytes) {
        Ok(html) => trim_head(html).into_bytes(),
        Err(_) => bytes.to_vec(),
    };

    parts.headers.remove(http::header::TRANSFER_ENCODING);
    if let Ok(hv) = HeaderValue::from_str(&out.len().to_string()) {
        parts.headers.insert(http::header::CONTENT_LENGTH, hv);
    }

    Ok(Response::from_parts(parts, full_body(out)))
}
