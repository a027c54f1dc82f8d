//! OAuth 2.0 authorization code client
//!
//! This crate covers the client half of the authorization code grant:
//! - Building the authorization URI a resource owner is redirected to
//! - Exchanging the returned code for an access/refresh token pair
//! - Mapping token endpoint failures onto typed errors
//!
//! Token storage, refresh, PKCE and the redirect callback route belong to the
//! embedding application.
//!
//! # Example
//!
//! ```rust,no_run
//! use oauth_code_client::{ClientConfig, OAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("client-id", "client-secret", "https://app.example.com/callback");
//!     let client = OAuthClient::new(config);
//!
//!     // Send the user here
//!     let auth_uri = client.authorization_uri("https://auth.example.com", &["openid", "profile"])?;
//!     println!("{auth_uri}");
//!
//!     // ...then trade the code from the callback for tokens
//!     let token = client
//!         .exchange_code("https://auth.example.com", "code-from-callback", &["openid", "profile"])
//!         .await?;
//!     println!("expires in {}s", token.expires_in);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{join_scopes, OAuthClient};
pub use error::*;
pub use models::{AccessToken, ClientConfig, DEFAULT_AUTHORIZATION_PATH, DEFAULT_TOKEN_PATH};
pub use transport::{BoxError, HttpTransport, ReqwestTransport};
