use isahc::{Request, http::StatusCode, prelude::AsyncReadResponseExt};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, config::Api};

use super::{
    http_client::HttpClient,
    model::{CheckResponse, IpRecord},
};

/// Outcome of checking a single address.
#[derive(Debug)]
pub enum Lookup {
    Found(IpRecord),
    Skipped(SkipReason),
}

impl Lookup {
    fn from_body(body: &str) -> Self {
        let response: CheckResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(err) => return Lookup::Skipped(SkipReason::Decode(err)),
        };

        match response.data {
            None | Some(Value::Null) => Lookup::Skipped(SkipReason::NoData),
            Some(Value::Object(map)) if map.is_empty() => Lookup::Skipped(SkipReason::NoData),
            Some(data) => match serde_json::from_value(data) {
                Ok(record) => Lookup::Found(record),
                Err(err) => Lookup::Skipped(SkipReason::Decode(err)),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("Error: Invalid or unauthorized API key. Please check your key.")]
    InvalidKey(StatusCode),
    #[error("Error: API rate limit exceeded. Please wait and try again later.")]
    RateLimited,
    #[error("Error details: {body}")]
    Status { status: StatusCode, body: String },
    #[error("{0}")]
    Network(Error),
    #[error("{0}")]
    Decode(serde_json::Error),
    #[error("no data returned")]
    NoData,
}

impl SkipReason {
    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SkipReason::InvalidKey(status),
            StatusCode::TOO_MANY_REQUESTS => SkipReason::RateLimited,
            _ => SkipReason::Status { status, body },
        }
    }

    /// The HTTP status that caused the skip, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SkipReason::InvalidKey(status) | SkipReason::Status { status, .. } => Some(*status),
            SkipReason::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckQuery<'a> {
    ip_address: &'a str,
    max_age_in_days: u32,
}

pub struct AbuseIpDb<'a> {
    client: &'a HttpClient,
    base_url: &'a str,
    api_key: &'a str,
    max_age_in_days: u32,
}

impl<'a> AbuseIpDb<'a> {
    pub fn new(client: &'a HttpClient, api: &'a Api, api_key: &'a str) -> Self {
        Self {
            client,
            base_url: api.base_url.trim_end_matches('/'),
            api_key,
            max_age_in_days: api.max_age_in_days,
        }
    }

    /// Checks one address. Transport and decoding problems are folded into
    /// `Lookup::Skipped` so the caller can move on to the next address.
    pub async fn check(&self, ip_address: &str) -> Lookup {
        match self.request(ip_address).await {
            Ok(lookup) => lookup,
            Err(err) => Lookup::Skipped(SkipReason::Network(err)),
        }
    }

    async fn request(&self, ip_address: &str) -> Result<Lookup, Error> {
        let query = serde_urlencoded::to_string(CheckQuery {
            ip_address,
            max_age_in_days: self.max_age_in_days,
        })?;
        let url = format!("{}/check?{}", self.base_url, query);
        let request = Request::get(url)
            .header("Key", self.api_key)
            .header("Accept", "application/json")
            .body(())?;

        let mut response = self.client.send_async(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} answered {}", ip_address, status);

        if !status.is_success() {
            return Ok(Lookup::Skipped(SkipReason::from_status(status, body)));
        }

        let lookup = Lookup::from_body(&body);
        if let Lookup::Skipped(reason) = &lookup {
            warn!("unusable response for {}: {}", ip_address, reason);
        }
        Ok(lookup)
    }
}
