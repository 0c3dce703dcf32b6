//! Domain data structures for addresses and collection events.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Unique Property Reference Number identifying a site.
pub struct Uprn(pub String);

impl fmt::Display for Uprn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Candidate or selected site returned from an address lookup.
///
/// Immutable once fetched; identity is the UPRN. All optional fields are
/// carried as the strings the backend delivers them in.
pub struct Address {
    /// Site identifier used to key schedule lookups.
    pub uprn: Uprn,
    /// Human-friendly display label.
    pub short_address: String,
    /// WGS84 latitude, when the backend supplies one.
    pub latitude: Option<String>,
    /// WGS84 longitude, when the backend supplies one.
    pub longitude: Option<String>,
    /// OS grid northing.
    pub northing: Option<String>,
    /// OS grid easting.
    pub easting: Option<String>,
    /// Council-internal site id.
    pub site_id: Option<String>,
    /// Council-internal account/site link id.
    pub account_site_id: Option<String>,
    /// Unique Street Reference Number.
    pub usrn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One scheduled pickup, as reported by the collections endpoint.
///
/// Value object; there is no identity beyond (service, date). The `date`
/// field is kept raw because the backend uses two different formats
/// depending on which upstream system answered.
pub struct CollectionEvent {
    /// Free-text service label, e.g. "Food Waste Collection Service".
    pub service: String,
    /// Collection round identifier.
    pub round: String,
    /// Schedule descriptor, e.g. "Fri Wk1".
    pub schedule: String,
    /// Weekday name.
    pub day: String,
    /// Raw date string, either ISO or `DD/MM/YYYY HH:MM:SS`.
    pub date: String,
    /// Pre-formatted display date from the server, when present.
    pub read_date: Option<String>,
}
