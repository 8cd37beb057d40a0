// Remote client module: the operations shipper needs from the upload
// server, plus a small blocking HTTP implementation of them.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;

/// Header carrying the access key on authenticated requests.
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Upload target handed out by the server for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadTicket {
    /// Server-side upload identifier, needed to confirm the upload.
    pub id: String,
    /// Short-lived URL the bytes are sent to.
    pub url: String,
}

/// Operations consumed by the service. Failures carry their cause as
/// `anyhow::Error`; the service decides how to report them.
pub trait RemoteClient {
    fn acquire_access_key(&self, server: &str) -> Result<String>;

    fn revoke_access_key(&self, server: &str, access_key: &str) -> Result<()>;

    fn get_upload_url(&self, server: &str, access_key: &str, bundle_id: &str)
        -> Result<UploadTicket>;

    fn upload_file(&self, url: &str, data: Vec<u8>) -> Result<()>;

    fn confirm_upload(&self, server: &str, access_key: &str, upload_id: &str) -> Result<()>;
}

#[derive(Deserialize)]
struct AccessKeyResponse {
    #[serde(rename = "accessKey")]
    access_key: String,
}

/// Blocking HTTP implementation of `RemoteClient`.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    host_name: String,
}

impl HttpClient {
    /// Build a client that registers this machine under its host name.
    /// `SHIPPER_HOSTNAME` overrides the OS host name.
    pub fn new() -> Result<Self> {
        Self::with_host_name(resolve_host_name(std::env::var("SHIPPER_HOSTNAME").ok()))
    }

    pub fn with_host_name(host_name: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("shipper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpClient {
            client,
            host_name: host_name.into(),
        })
    }
}

/// Explicit override first, then the OS host name, then `shipper`.
fn resolve_host_name(explicit: Option<String>) -> String {
    explicit
        .filter(|h| !h.trim().is_empty())
        .or_else(|| gethostname::gethostname().into_string().ok())
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "shipper".into())
}

/// Append `segments` to the server address. Each segment is percent-encoded,
/// so identifiers containing `/`, `?` or `#` stay a single path segment.
fn endpoint(server: &str, segments: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(server).with_context(|| format!("Invalid server address {}", server))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Invalid server address {}", server))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send the request and turn non-2xx answers into errors carrying the body.
fn send(req: RequestBuilder, what: &str) -> Result<Response> {
    let res = req
        .send()
        .with_context(|| format!("Failed to send {} request", what))?;
    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().unwrap_or_default();
        anyhow::bail!("{} failed: {} - {}", what, status, txt);
    }
    Ok(res)
}

impl RemoteClient for HttpClient {
    fn acquire_access_key(&self, server: &str) -> Result<String> {
        let url = endpoint(server, &["v1", "shippers"])?;
        let body = serde_json::json!({ "name": self.host_name });
        let res = send(self.client.post(url).json(&body), "access key")?;
        let resp: AccessKeyResponse = res.json().context("Parsing access key response json")?;
        if resp.access_key.is_empty() {
            anyhow::bail!("server returned an empty access key");
        }
        Ok(resp.access_key)
    }

    fn revoke_access_key(&self, server: &str, access_key: &str) -> Result<()> {
        let url = endpoint(server, &["v1", "shippers"])?;
        send(
            self.client.delete(url).header(ACCESS_KEY_HEADER, access_key),
            "revoke access key",
        )?;
        Ok(())
    }

    fn get_upload_url(
        &self,
        server: &str,
        access_key: &str,
        bundle_id: &str,
    ) -> Result<UploadTicket> {
        let url = endpoint(server, &["v1", "bundles", bundle_id, "uploads"])?;
        let res = send(
            self.client.post(url).header(ACCESS_KEY_HEADER, access_key),
            "upload URL",
        )?;
        let ticket: UploadTicket = res.json().context("Parsing upload URL response json")?;
        Ok(ticket)
    }

    fn upload_file(&self, url: &str, data: Vec<u8>) -> Result<()> {
        send(
            self.client
                .put(url)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(data),
            "upload",
        )?;
        Ok(())
    }

    fn confirm_upload(&self, server: &str, access_key: &str, upload_id: &str) -> Result<()> {
        let url = endpoint(server, &["v1", "uploads", upload_id, "confirm"])?;
        send(
            self.client.post(url).header(ACCESS_KEY_HEADER, access_key),
            "confirm upload",
        )?;
        Ok(())
    }
}
