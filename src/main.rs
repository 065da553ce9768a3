use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    homepanel_core::init()?;

    let app = homepanel_core::App::new().context("Failed to load configuration")?;

    tracing::info!("Homepanel starting");
    tracing::info!(
        "Config: {}",
        homepanel_core::Config::config_path().display()
    );

    let ctx = homepanel_ui::AppContext::from_config(app.shared_config())
        .context("Failed to set up the dashboard")?;

    homepanel_ui::serve(ctx, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown requested");
    })
    .await
    .context("Dashboard server failed")?;

    Ok(())
}
