//! Bandstand entry-point: loads configuration, opens the store, and serves
//! the REST API with OpenAPI docs in debug builds.

mod server;

use std::env;
use std::ffi::OsString;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bandstand::domain::ports::IdentityGateway;
use bandstand::inbound::http::health::HealthState;
use bandstand::settings::BandstandSettings;
use server::{Backends, ServerConfig, build_backends, create_server, spawn_identity_audit};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(env::args_os())?;
    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let same_site = same_site_from_env();

    let health_state = web::Data::new(HealthState::new());
    let Backends {
        http_state,
        identity,
    } = build_backends(&settings).await?;
    let audit = spawn_identity_audit(identity.subscribe());

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(key, cookie_secure, bind_addr).with_same_site(same_site);
    let server = create_server(health_state.clone(), http_state, config)?;

    health_state.mark_ready();
    info!(%bind_addr, "bandstand listening");
    let outcome = server.await;
    audit.abort();
    outcome
}

fn load_settings<I>(args: I) -> std::io::Result<BandstandSettings>
where
    I: IntoIterator<Item = OsString>,
{
    BandstandSettings::load_from_iter(args).map_err(|err| std::io::Error::other(err.to_string()))
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path = env::var("SESSION_KEY_FILE").unwrap_or_else(|_| SESSION_KEY_DEFAULT_PATH.into());
    match std::fs::read(&key_path) {
        Ok(bytes) if bytes.len() >= SESSION_KEY_MIN_LEN => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(std::io::Error::other(format!(
            "session key at {key_path} too short: need >= {SESSION_KEY_MIN_LEN} bytes, got {}",
            bytes.len()
        ))),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn same_site_from_env() -> SameSite {
    match env::var("SESSION_SAMESITE").ok().as_deref() {
        Some("Strict") => SameSite::Strict,
        Some("None") => SameSite::None,
        Some("Lax") | None => SameSite::Lax,
        Some(other) => {
            warn!(value = other, "invalid SESSION_SAMESITE; using Lax");
            SameSite::Lax
        }
    }
}
