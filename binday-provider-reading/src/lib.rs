//! Client for the Reading Borough Council address and collections endpoints.
//!
//! Both endpoints sit behind the same proxy base; only domain types from
//! `binday-core` cross this crate's boundary, the wire shapes stay private.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use binday_core::model::{Address, CollectionEvent, Uprn};
use binday_core::ports::{AddressLookup, ProviderError, ScheduleSource};

const NO_ADDRESSES: &str = "No addresses found for this postcode";
const NO_COLLECTIONS: &str = "No collection data found for this address";

/// Wire shape of `/rbc/getaddresses/{postcode}`.
#[derive(Debug, Deserialize)]
struct AddressesResponse {
    #[serde(rename = "Addresses", default)]
    addresses: Vec<WireAddress>,
}

/// Single entry of the `Addresses` array.
#[derive(Debug, Deserialize)]
struct WireAddress {
    #[serde(rename = "AccountSiteUprn")]
    account_site_uprn: String,
    #[serde(rename = "SiteShortAddress")]
    site_short_address: String,
    #[serde(rename = "SiteLatitude", default)]
    site_latitude: Option<String>,
    #[serde(rename = "SiteLongitude", default)]
    site_longitude: Option<String>,
    #[serde(rename = "SiteNorthing", default)]
    site_northing: Option<String>,
    #[serde(rename = "SiteEasting", default)]
    site_easting: Option<String>,
    #[serde(rename = "SiteId", default)]
    site_id: Option<String>,
    #[serde(rename = "AccountSiteId", default)]
    account_site_id: Option<String>,
    #[serde(default)]
    usrn: Option<String>,
}

impl From<WireAddress> for Address {
    fn from(wire: WireAddress) -> Self {
        Address {
            uprn: Uprn(wire.account_site_uprn),
            short_address: wire.site_short_address,
            latitude: wire.site_latitude,
            longitude: wire.site_longitude,
            northing: wire.site_northing,
            easting: wire.site_easting,
            site_id: wire.site_id,
            account_site_id: wire.account_site_id,
            usrn: wire.usrn,
        }
    }
}

/// Wire shape of `/api/collections/{uprn}`.
#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    collections: Option<Vec<WireCollection>>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Single pickup entry of the `collections` array.
#[derive(Debug, Deserialize)]
struct WireCollection {
    service: String,
    #[serde(default)]
    round: String,
    #[serde(default)]
    schedule: String,
    #[serde(default)]
    day: String,
    date: String,
    #[serde(default)]
    read_date: Option<String>,
}

impl From<WireCollection> for CollectionEvent {
    fn from(wire: WireCollection) -> Self {
        CollectionEvent {
            service: wire.service,
            round: wire.round,
            schedule: wire.schedule,
            day: wire.day,
            date: wire.date,
            read_date: wire.read_date,
        }
    }
}

/// HTTP client for both council endpoints.
///
/// `base_url` points at the proxy root; pass a mock server URL in tests.
pub struct ReadingClient {
    client: Client,
    base_url: String,
}

impl ReadingClient {
    /// Create a client bound to the given HTTP client and proxy base.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// GET `url`, map the status, and decode the body as JSON.
    ///
    /// The body is read as text first so a non-JSON payload can be told
    /// apart from a transport failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        not_found: &str,
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(not_found.to_owned()));
        }
        if !status.is_success() {
            return Err(ProviderError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            // An HTML page here usually means the request never reached
            // the council proxy.
            let head = body.trim_start().to_lowercase();
            if head.starts_with("<!doctype html") || head.starts_with("<html") {
                ProviderError::Parse(
                    "got HTML instead of JSON, check the proxy configuration".to_owned(),
                )
            } else {
                ProviderError::Parse(err.to_string())
            }
        })
    }
}

#[async_trait]
impl AddressLookup for ReadingClient {
    async fn lookup(&self, postcode: &str) -> Result<Vec<Address>, ProviderError> {
        let url = format!("{}/rbc/getaddresses/{postcode}", self.base_url);
        tracing::debug!(%postcode, "looking up addresses");

        let response: AddressesResponse = self.get_json(url, NO_ADDRESSES).await?;
        if response.addresses.is_empty() {
            return Err(ProviderError::NotFound(NO_ADDRESSES.to_owned()));
        }
        Ok(response.addresses.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ScheduleSource for ReadingClient {
    async fn collections(&self, uprn: &Uprn) -> Result<Vec<CollectionEvent>, ProviderError> {
        let url = format!("{}/api/collections/{uprn}", self.base_url);
        tracing::debug!(%uprn, "fetching collection schedule");

        let response: CollectionsResponse = self.get_json(url, NO_COLLECTIONS).await?;
        match (response.success, response.collections) {
            // Events are returned exactly as received: same order, no
            // future-only filtering.
            (true, Some(collections)) => Ok(collections.into_iter().map(Into::into).collect()),
            _ => match response.error_description {
                Some(message) => Err(ProviderError::Api(message)),
                None => Ok(Vec::new()),
            },
        }
    }
}
