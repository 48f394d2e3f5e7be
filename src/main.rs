use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use account_panel::api::{self, ApiState};
use account_panel::client::AccountClient;
use account_panel::config::PanelConfig;
use account_panel::meter::{QuotaMeter, QuotaModel, UserQuotaState};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = PanelConfig::from_env()?;
    info!(
        host = %config.host,
        port = config.port,
        api_root = %config.api_root,
        "starting account-panel service"
    );

    let client = AccountClient::new(&config.api_root, config.request_timeout())?;
    let user_id = config.user_id.clone().unwrap_or_default();
    let model = QuotaModel::new(UserQuotaState::new(user_id));
    let meter = QuotaMeter::new(model, config.thresholds());
    let _render_task = meter.start_render_task();

    let addr = config.listen_addr();
    let state = Arc::new(ApiState::new(client, meter));
    let router = api::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("account-panel service shutting down");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
