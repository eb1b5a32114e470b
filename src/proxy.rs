use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, Response, StatusCode, Uri},
    Router,
};
use reqwest::Url;

use crate::{
    config::{Config, ConfigError},
    error::ProxyError,
    rewrite::rewrite_metadata,
};

/// Only responses under this path segment are rewritten.
pub const METADATA_SEGMENT: &str = "/library/metadata/";

/// Request headers not copied onto a metadata request. Dropping
/// `accept-encoding` keeps plex from compressing the body we need to parse.
const SKIPPED_METADATA_HEADERS: [HeaderName; 3] =
    [header::ACCEPT_ENCODING, header::HOST, header::CONTENT_LENGTH];

/// Response headers that no longer describe a buffered, rewritten body.
const STALE_RESPONSE_HEADERS: [HeaderName; 2] =
    [header::CONTENT_LENGTH, header::TRANSFER_ENCODING];

#[derive(Clone)]
struct ProxyState {
    client: reqwest::Client,
    plex_url: Url,
    forward_unmatched: bool,
}

fn client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .build()
        .map_err(ConfigError::HttpClient)
}

fn plex_url_for(plex_url: &Url, uri: &Uri) -> Url {
    let mut url = plex_url.clone();
    url.set_path(uri.path());
    url.set_query(uri.query());
    url
}

fn response(status: StatusCode, headers: HeaderMap, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Forwards a request untouched, streaming both bodies.
async fn pass_to_plex(
    state: &ProxyState,
    request: Request,
) -> Result<Response<Body>, ProxyError> {
    let url = plex_url_for(&state.plex_url, request.uri());
    log::debug!("Forwarding {} {}", request.method(), url);

    let mut headers = request.headers().clone();
    headers.remove(header::HOST);

    let plex_resp = state
        .client
        .request(request.method().clone(), url)
        .headers(headers)
        .body(reqwest::Body::wrap_stream(request.into_body().into_data_stream()))
        .send()
        .await
        .map_err(ProxyError::from_send)?;

    let status = plex_resp.status();
    let headers = plex_resp.headers().clone();

    Ok(response(status, headers, Body::from_stream(plex_resp.bytes_stream())))
}

/// Fetches a metadata response from plex and rewrites its body.
async fn rewrite_from_plex(
    state: &ProxyState,
    request: Request,
) -> Result<Response<Body>, ProxyError> {
    let url = plex_url_for(&state.plex_url, request.uri());
    log::debug!("Rewriting {} {}", request.method(), url);

    let mut headers = request.headers().clone();
    for name in SKIPPED_METADATA_HEADERS {
        headers.remove(name);
    }

    let plex_resp = state
        .client
        .request(request.method().clone(), url)
        .headers(headers)
        .send()
        .await
        .map_err(ProxyError::from_send)?;

    // take the whole body, we need it for parsing anyway
    let status = plex_resp.status();
    let mut headers = plex_resp.headers().clone();
    for name in STALE_RESPONSE_HEADERS {
        headers.remove(name);
    }

    let data = plex_resp.bytes().await.map_err(ProxyError::from_body)?;
    let data = rewrite_metadata(data);

    Ok(response(status, headers, Body::from(data)))
}

async fn handle(
    State(state): State<ProxyState>,
    request: Request,
) -> Result<Response<Body>, ProxyError> {
    if request.uri().path().contains(METADATA_SEGMENT) {
        return rewrite_from_plex(&state, request).await;
    }

    if state.forward_unmatched {
        return pass_to_plex(&state, request).await;
    }

    log::debug!("Ignoring {}", request.uri().path());
    Ok(Response::new(Body::empty()))
}

pub fn make_proxy(config: &Config) -> Result<Router, ConfigError> {
    let state = ProxyState {
        client: client(config.timeout())?,
        plex_url: config.plex_url()?,
        forward_unmatched: config.forward_unmatched,
    };

    Ok(Router::new().fallback(handle).with_state(state))
}
