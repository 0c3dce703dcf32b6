//! Traits describing the backend and persistence interfaces.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Address, CollectionEvent, Uprn};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced while resolving addresses or fetching schedules.
///
/// None of these are fatal; the controller maps each to a displayed
/// message and returns to a retryable state.
pub enum ProviderError {
    /// Network layer failed, including transport timeouts.
    #[error("Network error: {0}")]
    Transport(#[from] ReqwestError),
    /// Backend answered with an unexpected HTTP status.
    #[error("Request failed with status {0}")]
    Http(u16),
    /// Backend had no data for the request.
    #[error("{0}")]
    NotFound(String),
    /// Response body was not the JSON we expect.
    #[error("Invalid response from server: {0}")]
    Parse(String),
    /// Backend reported an application-level error of its own.
    #[error("{0}")]
    Api(String),
    /// Input does not match the UK postcode pattern.
    #[error("Please enter a valid UK postcode")]
    InvalidPostcode,
    /// Input was empty or whitespace-only.
    #[error("Please enter a postcode")]
    EmptyPostcode,
}

#[async_trait]
/// Address lookup backend keyed by normalized postcode.
pub trait AddressLookup: Send + Sync {
    /// Resolve candidate addresses for a normalized postcode.
    ///
    /// An empty candidate list is reported as
    /// [`ProviderError::NotFound`], never as an empty success.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the backend request fails or
    /// yields no addresses.
    async fn lookup(&self, postcode: &str) -> Result<Vec<Address>, ProviderError>;
}

#[async_trait]
/// Collection schedule backend keyed by site UPRN.
pub trait ScheduleSource: Send + Sync {
    /// Fetch collection events for a resolved site, in server order.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the backend request fails.
    async fn collections(&self, uprn: &Uprn) -> Result<Vec<CollectionEvent>, ProviderError>;
}

#[derive(thiserror::Error, Debug)]
#[error("Preference store error: {0}")]
/// Failure inside a [`PreferenceStore`] implementation.
///
/// Never reaches the user; the selection store logs and swallows it.
pub struct StoreError(pub String);

#[async_trait]
/// Scoped key/value persistence used for remembering the selection.
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the underlying store cannot be
    /// written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
