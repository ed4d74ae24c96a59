use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use std::fmt;

use crate::core::constants::storage;
use crate::core::error::{Result, SheetdashError};

/// How requests to the blob endpoint are authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    /// HMAC-SHA256 Shared Key signing with the decoded account key
    SharedKey { account: &'a str, key: &'a [u8] },
    /// Pre-signed SAS token appended to the query string
    Sas(&'a str),
    /// Public container, no authorization
    Anonymous,
}

/// A parsed Azure Storage connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: String,
    pub blob_endpoint: String,
    account_key: Option<Vec<u8>>,
    sas_token: Option<String>,
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("account_name", &self.account_name)
            .field("blob_endpoint", &self.blob_endpoint)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ConnectionString {
    /// Parse `Key=Value;Key=Value` pairs. Keys are case-insensitive and
    /// values may contain `=` (base64 keys, SAS tokens).
    pub fn parse(raw: &str) -> Result<Self> {
        let mut protocol = None;
        let mut account_name = None;
        let mut account_key = None;
        let mut suffix = None;
        let mut blob_endpoint = None;
        let mut sas_token = None;
        let mut development = false;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                SheetdashError::Credentials(format!(
                    "connection string segment '{segment}' is not Key=Value"
                ))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => protocol = Some(value),
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "endpointsuffix" => suffix = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "sharedaccesssignature" => {
                    sas_token = Some(value.trim_start_matches('?').to_string())
                }
                "usedevelopmentstorage" => development = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if development {
            return Ok(Self {
                account_name: storage::DEV_ACCOUNT_NAME.to_string(),
                blob_endpoint: storage::DEV_BLOB_ENDPOINT.to_string(),
                account_key: Some(STANDARD.decode(storage::DEV_ACCOUNT_KEY)?),
                sas_token: None,
            });
        }

        let account_name = account_name.unwrap_or_default();
        let blob_endpoint = match blob_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if !account_name.is_empty() => format!(
                "{}://{}.blob.{}",
                protocol.as_deref().unwrap_or(storage::DEFAULT_PROTOCOL),
                account_name,
                suffix.as_deref().unwrap_or(storage::DEFAULT_ENDPOINT_SUFFIX)
            ),
            None => {
                return Err(SheetdashError::Credentials(
                    "connection string needs AccountName or BlobEndpoint".to_string(),
                ));
            }
        };

        let account_key = match account_key {
            Some(_) if account_name.is_empty() => {
                return Err(SheetdashError::Credentials(
                    "AccountKey given without AccountName".to_string(),
                ));
            }
            Some(key) => Some(STANDARD.decode(key)?),
            None => None,
        };

        Ok(Self {
            account_name,
            blob_endpoint,
            account_key,
            sas_token,
        })
    }

    /// Credential to use, preferring a SAS token over Shared Key
    pub fn credential(&self) -> Credential<'_> {
        if let Some(ref sas) = self.sas_token {
            Credential::Sas(sas)
        } else if let Some(ref key) = self.account_key {
            Credential::SharedKey {
                account: &self.account_name,
                key,
            }
        } else {
            Credential::Anonymous
        }
    }
}

/// Where the spreadsheet lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub connection: ConnectionString,
    pub container: String,
    pub blob: String,
}

impl StorageLocation {
    /// Full blob URL, with the SAS token attached when one is configured
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.connection.blob_endpoint).map_err(|e| {
            SheetdashError::Credentials(format!(
                "invalid blob endpoint '{}': {e}",
                self.connection.blob_endpoint
            ))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SheetdashError::Credentials(format!(
                    "blob endpoint '{}' cannot carry a path",
                    self.connection.blob_endpoint
                ))
            })?;
            segments.pop_if_empty().push(&self.container);
            segments.extend(self.blob.split('/').filter(|s| !s.is_empty()));
        }

        if let Credential::Sas(token) = self.connection.credential() {
            url.set_query(Some(token));
        }

        Ok(url)
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.connection.blob_endpoint, self.container, self.blob
        )
    }
}
