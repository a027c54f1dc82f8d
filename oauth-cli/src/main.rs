use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use logger_redacted::init_logging;
use oauth_code_client::{OAuthClient, ReqwestTransport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod settings;

use settings::{EndpointSettings, Settings};

/// OAuth 2.0 authorization code client
#[derive(Parser, Debug)]
#[command(name = "oauth-client", version)]
#[command(about = "Build authorization URIs and exchange authorization codes for tokens")]
struct Args {
    /// Configuration file path (defaults to ./oauth-client.{toml,yaml,json})
    #[arg(short, long, global = true, env = "OAUTH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the URI the resource owner should be redirected to
    AuthorizeUrl {
        /// Authorization server base URL (overrides endpoints.authorization_url)
        #[arg(long)]
        base_url: Option<String>,

        /// Requested scope; repeat for several (overrides endpoints.scopes)
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },

    /// Exchange an authorization code and print the token as JSON
    Exchange {
        /// Token server base URL (overrides endpoints.token_url)
        #[arg(long)]
        token_url: Option<String>,

        /// Authorization code received on the redirect URI
        #[arg(long)]
        code: String,

        /// Requested scope; repeat for several (overrides endpoints.scopes)
        #[arg(long = "scope")]
        scopes: Vec<String>,

        /// Abort the token request after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let settings =
        Settings::load(args.config.as_deref()).context("Failed to load client configuration")?;

    init_logging(&settings.logging.clone().verbose(args.verbose))
        .context("Failed to initialise logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting oauth-client");

    match args.command {
        Command::AuthorizeUrl { base_url, scopes } => {
            let base_url = resolve_url(base_url, settings.endpoints.authorization_url.as_deref(), "authorization")?;
            let scopes = resolve_scopes(scopes, &settings.endpoints);

            let client = OAuthClient::new(settings.client);
            let uri = client
                .authorization_uri(&base_url, &scopes)
                .context("Failed to build authorization URI")?;

            println!("{uri}");
        }
        Command::Exchange {
            token_url,
            code,
            scopes,
            timeout_secs,
        } => {
            let token_url = resolve_url(token_url, settings.endpoints.token_url.as_deref(), "token")?;
            let scopes = resolve_scopes(scopes, &settings.endpoints);

            let mut transport = ReqwestTransport::new();
            if let Some(secs) = timeout_secs {
                transport = transport.with_timeout(Duration::from_secs(secs));
            }

            let client = OAuthClient::with_transport(settings.client, transport);
            let token = client
                .exchange_code(&token_url, &code, &scopes)
                .await
                .context("Authorization code exchange failed")?;

            println!("{}", serde_json::to_string_pretty(&token)?);
        }
    }

    Ok(())
}

/// Command line value first, then the configured endpoint
fn resolve_url(flag: Option<String>, configured: Option<&str>, endpoint: &str) -> Result<String> {
    flag.or_else(|| configured.map(str::to_owned)).ok_or_else(|| {
        anyhow!("No {endpoint} URL given; pass it on the command line or set endpoints.{endpoint}_url")
    })
}

fn resolve_scopes(flags: Vec<String>, endpoints: &EndpointSettings) -> Vec<String> {
    if flags.is_empty() {
        endpoints.scopes.clone()
    } else {
        flags
    }
}
