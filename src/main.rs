// --- QuickSlot: análisis de choques y carga docente (API) ---

use std::error::Error;

use quickslot::{logging, run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let config = AppConfig::from_env()?;
    tracing::info!(
        "=== QuickSlot (API) === serving {} from http://{}",
        config.data_dir.display(),
        config.bind
    );
    run_server(config).await?;
    Ok(())
}
