//! HTTP surface
//!
//! - `GET /view-image/{filename}`: report the access, then stream the file
//!   or answer 404 `Image not found.`
//! - `GET /healthz`: liveness, no reporting
//!
//! Every response carries the configured content security policy.

use crate::client::client_ip;
use crate::event::AccessEvent;
use crate::store::ServedImage;
use crate::Gateway;
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use warp::http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use warp::http::{Method, StatusCode};
use warp::hyper::Body;
use warp::path::Tail;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Body of every 404 from the image route
pub const NOT_FOUND_BODY: &str = "Image not found.";

/// Full filter tree for a gateway
pub fn routes(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let csp = gateway.csp_header().clone();

    let view_image = warp::get()
        .and(warp::path("view-image"))
        .and(warp::path::tail())
        .and(warp::addr::remote())
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::header::optional::<String>("user-agent"))
        .and(with_gateway(gateway.clone()))
        .then(view_image);

    let health = warp::get()
        .and(warp::path("healthz"))
        .and(warp::path::end())
        .map(|| "ok");

    let cors = if gateway.config().cors_allow_any_origin {
        warp::cors().allow_any_origin()
    } else {
        warp::cors()
    }
    .allow_methods([Method::GET, Method::OPTIONS]);

    view_image
        .or(health)
        .with(cors)
        .recover(handle_rejection)
        .with(warp::reply::with::header("content-security-policy", csp))
        .with(warp::trace::request())
}

fn with_gateway(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (Arc<Gateway>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&gateway))
}

async fn view_image(
    tail: Tail,
    remote: Option<SocketAddr>,
    forwarded_for: Option<String>,
    user_agent: Option<String>,
    gateway: Arc<Gateway>,
) -> Response {
    let filename = percent_decode_str(tail.as_str())
        .decode_utf8_lossy()
        .into_owned();
    let ip = client_ip(
        remote,
        forwarded_for.as_deref(),
        gateway.config().trust_proxy,
    );

    tracing::info!(%filename, %ip, "Image requested");

    gateway
        .reporter()
        .report(AccessEvent::new(&filename, ip, user_agent.unwrap_or_default()));

    match gateway.store().open(&filename).await {
        Ok(image) => stream_image(image),
        Err(error) => {
            if error.is_rejected() {
                tracing::warn!(%filename, %error, "Refused image request");
            } else {
                tracing::debug!(%filename, %error, "Image not served");
            }
            not_found()
        }
    }
}

fn stream_image(image: ServedImage) -> Response {
    let mut response = Response::new(Body::wrap_stream(ReaderStream::new(image.file)));
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(image.content_type.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(image.len));
    response
}

fn not_found() -> Response {
    warp::reply::with_status(NOT_FOUND_BODY, StatusCode::NOT_FOUND).into_response()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, body) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else if rejection.find::<warp::cors::CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, "Forbidden")
    } else {
        tracing::error!(?rejection, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };
    Ok(warp::reply::with_status(body, status).into_response())
}
