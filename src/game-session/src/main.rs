use std::error;

use common::{model::locale::LocaleTable, utility::shutdown_signal};
use game_session::{
    entrypoint::{init_logging, serve, SessionConfig},
    service::session::GameSession,
};
use tokio::io::{stdin, BufReader};
use tracing::info;

type Result<T> = std::result::Result<T, Box<dyn error::Error>>;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // Config
    let config = SessionConfig::from_env()?;
    // Every selectable language needs a complete entry before anything renders
    let locales = LocaleTable::embedded()?;
    info!("Starting with {:?}", config);

    let strategy = config.strategy();
    let session = GameSession::new(config, locales, strategy)?;
    serve(
        session,
        BufReader::new(stdin()),
        std::io::stdout(),
        shutdown_signal(),
    )
    .await?;
    Ok(())
}
