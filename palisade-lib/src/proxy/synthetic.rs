use bytes::Bytes;
use http::StatusCode;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::Response;

use crate::policy::DenyReason;
use crate::proxy::http_result::{HttpError, HttpResult};

pub(crate) type RespBody = BoxBody<Bytes, hyper::Error>;

/// Build the fixed terminal response for a gate denial
pub(crate) fn deny_response(reason: &DenyReason) -> HttpResult<Response<RespBody>> {
    let res = Response::builder()
        .status(reason.status())
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(full_body(reason.body().as_bytes().to_vec()))
        .map_err(|e| HttpError::ResponseRebuild(format!("Failed to build deny response: {e}")))?;
    Ok(res)
}

/// Build HTTP response with status code of 4xx and 5xx
pub(crate) fn synthetic_error_response(status_code: StatusCode) -> HttpResult<Response<RespBody>> {
    let res = Response::builder()
        .status(status_code)
        .body(empty_body())
        .map_err(|e| HttpError::ResponseRebuild(format!("Failed to build error response: {e}")))?;
    Ok(res)
}

/// Permanent redirect, used to bounce plain-HTTP admin traffic to HTTPS
pub(crate) fn redirect_response(location: &str) -> HttpResult<Response<RespBody>> {
    let res = Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(http::header::LOCATION, location)
        .body(empty_body())
        .map_err(|e| HttpError::ResponseRebuild(format!("Failed to build redirect: {e}")))?;
    Ok(res)
}

pub(crate) fn full_body(bytes: Vec<u8>) -> RespBody {
    Full::new(Bytes::from(bytes))
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) fn empty_body() -> RespBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}
