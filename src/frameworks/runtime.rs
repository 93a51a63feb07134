// Framework bootstrap for the client runtime.

use crate::domain::ExpiryHook;
use crate::frameworks::config::{self, ClientConfig};
use crate::interface_adapters::clients::{AccommodationClient, HttpAuthApi, WishlistClient};
use crate::interface_adapters::session_marker::CookieSessionMarker;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::transport::TransportClient;
use crate::use_cases::{AuthSessionController, ErrorCodeTable, resolve_full};

use std::{io::Result, sync::Arc};

// Crate logs at info; the HTTP stack only when something goes wrong.
const DEFAULT_LOG_FILTER: &str = "warn,stay_client=info";

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if config::json_logs() {
        builder.json().with_current_span(true).init();
    } else {
        builder.compact().init();
    }

    // A panic in a focus watcher task would otherwise only reach stderr.
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line()));
        tracing::error!(%info, ?location, "client panicked");
    }));
}

// Wires transport, session controller and endpoint clients around one
// expiry hook, then mounts the controller (which probes the session).
pub async fn build_state(config: &ClientConfig) -> Result<AppState> {
    if let Some(path) = &config.error_codes_path {
        let table = config::load_error_table(path).map_err(std::io::Error::other)?;
        tracing::debug!(path = %path.display(), codes = table.len(), "error codes loaded");
        if ErrorCodeTable::install(table).is_err() {
            tracing::warn!("error code table already initialized, overrides ignored");
        }
    }

    let hook = ExpiryHook::new();
    let transport = TransportClient::new(config.api_base_url.clone(), config.http_timeout, hook.clone())
        .map_err(|e| std::io::Error::other(format!("failed to initialize transport: {e}")))?;
    tracing::debug!(
        environment = ?config.environment,
        api_base_url = %config.api_base_url,
        http_timeout_ms = config.http_timeout.as_millis(),
        "transport configured"
    );

    let marker = CookieSessionMarker::new(
        transport.cookie_jar(),
        transport.base_url().clone(),
        config.session_cookie_name.clone(),
    );
    let session =
        AuthSessionController::mount(HttpAuthApi::new(transport.clone()), marker, hook).await;

    Ok(AppState {
        accommodations: AccommodationClient::new(transport.clone()),
        wishlists: WishlistClient::new(transport.clone()),
        session: Arc::new(session),
        transport,
    })
}

// Probes the session against the configured backend and, when LOGIN_EMAIL and
// LOGIN_PASSWORD are set, tries to log in.
pub async fn run() -> Result<()> {
    init_runtime();

    let config = ClientConfig::from_env().map_err(std::io::Error::other)?;
    let state = build_state(&config).await?;
    let session = state.session.state();
    tracing::info!(authenticated = session.authenticated, "session probed");

    if let Some(credentials) = config::login_credentials() {
        match state.session.login(&credentials).await {
            Ok(()) => tracing::info!("logged in"),
            Err(err) => tracing::warn!(
                code = %err.code,
                message = %resolve_full(&err),
                "login rejected"
            ),
        }
    }

    state.session.unmount();
    Ok(())
}
