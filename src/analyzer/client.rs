use http_body_util::BodyExt;
use hyper::{header, Method, Request, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::error::AppError;

pub type HttpClient = Client<hyper_tls::HttpsConnector<HttpConnector>, String>;

const USER_AGENT: &str = concat!("page_analyzer/", env!("CARGO_PKG_VERSION"));

/// Bodies are cut at this size. Only the prefix is analysed.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: String,
}

pub fn create_client() -> HttpClient {
    let https = hyper_tls::HttpsConnector::new();
    Client::builder(TokioExecutor::new()).build(https)
}

/// GET a page. Redirects are not followed, so the status is what `url` itself answers.
pub async fn fetch_page(
    client: &HttpClient,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, AppError> {
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))?;

    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .body(String::new())
        .map_err(|e| AppError::Fetch(e.to_string()))?;

    let exchange = async {
        let response = client
            .request(req)
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;
        let status = response.status();

        let mut body = response.into_body();
        let mut body_bytes = Vec::new();
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(|e| AppError::Fetch(e.to_string()))?;
            if let Some(chunk) = frame.data_ref() {
                let room = MAX_BODY_BYTES - body_bytes.len();
                if chunk.len() >= room {
                    body_bytes.extend_from_slice(&chunk[..room]);
                    break;
                }
                body_bytes.extend_from_slice(chunk);
            }
        }

        Ok::<_, AppError>(FetchedPage {
            status,
            body: String::from_utf8_lossy(&body_bytes).to_string(),
        })
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| AppError::Fetch(format!("{} timed out after {} ms", url, timeout.as_millis())))?
}
