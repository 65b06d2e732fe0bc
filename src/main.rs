mod adapters;
mod app;
mod core;
mod global_constants;
mod ports;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    let app = app::ScannerApp::build()?;
    app.run().await
}
