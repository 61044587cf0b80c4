//! Client module
//!
//! - `ApiClient` - capability interface (config + execute)
//! - `EntityApi` - entity verbs layered on any `ApiClient`
//! - `Client` - the concrete client, generic over its transport

mod api;
mod base;
mod login;

pub use self::api::{ApiClient, EntityApi};
pub use self::base::{Client, UnauthorizedHook};
pub use self::login::LoginCredentials;
