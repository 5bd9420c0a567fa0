use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hrportal_backend::{
    build_router,
    config::Config,
    db::connection::{create_pool, DbPool},
    state::AppState,
    utils::email::SmtpPayslipMailer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrportal_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        time_zone = %config.time_zone,
        smtp_host = %config.smtp.host,
        smtp_skip_send = config.smtp.skip_send,
        payslip_send_delay_secs = config.payslip_send_delay_secs,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(pool.as_ref()).await?;

    let mailer = Arc::new(SmtpPayslipMailer::new(&config.smtp)?);
    let addr: SocketAddr = config.bind_addr.parse()?;
    let app = build_router(AppState::with_pool(pool, mailer, config));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
