use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

use crate::core::constants::storage;
use crate::core::error::{Result, SheetdashError};
use crate::storage::connection::{Credential, StorageLocation};
use crate::storage::signing;

/// Downloads the raw bytes of one blob
#[async_trait]
pub trait FetchBlob: Send + Sync {
    async fn fetch(&self, location: &StorageLocation) -> Result<Vec<u8>>;
}

/// Blob service client over reqwest
#[derive(Debug, Clone)]
pub struct BlobClient {
    http: reqwest::Client,
}

impl BlobClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { http })
    }

    /// Headers for a GET of `location`, signed when a Shared Key is configured
    fn request_headers(&self, location: &StorageLocation) -> Result<HeaderMap> {
        let url = location.url()?;
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert("x-ms-date", header_value(&date)?);
        headers.insert("x-ms-version", HeaderValue::from_static(storage::API_VERSION));

        if let Credential::SharedKey { account, key } = location.connection.credential() {
            let ms_headers = [
                ("x-ms-date", date.as_str()),
                ("x-ms-version", storage::API_VERSION),
            ];
            let to_sign = signing::string_to_sign("GET", &url, &ms_headers, account);
            let signature = signing::sign(key, &to_sign)?;
            headers.insert(
                AUTHORIZATION,
                header_value(&signing::authorization_header(account, &signature))?,
            );
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SheetdashError::Credentials(format!("invalid header value: {e}")))
}

/// Pull the `<Code>` element out of an Azure XML error body
fn error_code_from_body(body: &str) -> Option<String> {
    let start = body.find("<Code>")? + "<Code>".len();
    let end = body[start..].find("</Code>")? + start;
    let code = body[start..end].trim();
    (!code.is_empty()).then(|| code.to_string())
}

#[async_trait]
impl FetchBlob for BlobClient {
    async fn fetch(&self, location: &StorageLocation) -> Result<Vec<u8>> {
        let url = location.url()?;
        let headers = self.request_headers(location)?;

        let response = self.http.get(url).headers(headers).send().await?;
        let status = response.status();

        if !status.is_success() {
            let header_code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();

            return Err(SheetdashError::Storage {
                status: status.as_u16(),
                code: header_code.or_else(|| error_code_from_body(&body)),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
