//! Request construction
//!
//! Translates entity operations into `RequestDescriptor`s for either API
//! dialect.
//!
//! # Dialects
//!
//! - **Standard**: list filters travel as one URL-encoded JSON `query`
//!   parameter, falling back to a POST with `X-HTTP-Method-Override: GET`
//!   when the URL would grow past 7500 characters.
//! - **App**: every filter field is its own query parameter.

mod builder;
mod query;
mod types;

pub use builder::{id_segment, RequestBuilder, MAX_URL_LENGTH, METHOD_OVERRIDE_HEADER};
pub use query::{
    app_query_string, encode_uri_component, standard_query, standard_query_string, RESERVED_KEYS,
};
pub use types::{mask_api_key, DownloadOptions, RawRequest, ReadParams, RequestDescriptor};
