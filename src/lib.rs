//! # PokitDok
//! Client for the PokitDok platform API: activities, cash prices, claims, eligibility,
//! enrollment, X12 file submission and providers.
//! Requests are authorized with an oauth 2.0 bearer token obtained through the client
//! credentials flow.
//! The client is based on the `Reqwest` and `Oauth2` library.
//!
//! Every call returns the decoded json body as a [`serde_json::Value`], the status code is
//! not checked.
//! There is no retry, pagination or automatic token refresh, call
//! [`PlatformClient::fetch_access_token`] to renew an expired token.
//!
//! ## Example code
//! ```no_run
//!# async fn doc_test() -> anyhow::Result<()> {
//! use pokitdok::{ClientConfig, PlatformClient};
//! use serde_json::json;
//!
//! // Set up the client, base url and api version default to https://platform.pokitdok.com and v3
//! let config = ClientConfig::new("xxxxxxxxxx", "xxxxxxxxxx");
//!
//! // Create a new client, this immediately tries to fetch a bearer token.
//! // If this fails your credentials are probably wrong.
//! let client = PlatformClient::connect(config).await?;
//!
//! let activities = client.activities(None).await?;
//! let eligibility = client
//!     .eligibility(&json!({
//!         "member": { "id": "W000000000", "first_name": "Jane", "last_name": "Doe" },
//!         "trading_partner_id": "MOCKPAYER"
//!     }))
//!     .await?;
//! let submitted = client.files("MOCKPAYER", "/tmp/claim.x12").await?;
//!
//!# Ok(())
//!# }
//! ```
mod error;
mod platform_client;
mod settings;

pub use crate::error::{BoxError, PlatformError, Result};
pub use crate::platform_client::PlatformClient;
pub use crate::settings::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
