//! Client for the exchangeratesapi.io foreign exchange rates API.
//!
//! The service publishes daily reference rates against a configurable base
//! currency, current and historical. This crate wraps its three endpoints
//! (`/latest`, `/{date}`, `/history`) behind typed operations on
//! [`Client`]: each call builds a query URL, performs one GET and decodes
//! the JSON body into a rate map. There is no caching and no retrying;
//! every call is a fresh round trip.

pub mod client;
pub mod error;

pub use crate::client::{Client, DatedRateMap, DEFAULT_BASE_URL, RateMap};
pub use crate::error::Error;
