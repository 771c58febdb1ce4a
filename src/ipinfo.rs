//! ipinfo.io lookup client and response schema.

mod client;
mod result;

pub use client::{GeoLookup, IPINFO_BASE_URL, IpInfoClient, REQUEST_TIMEOUT};
pub use result::{InfoField, LookupResult};
