//! Binary entry point: bring up logging, load the catalog (fatal on failure),
//! and hand the terminal to the command loop.
use anyhow::Context;
use iidx_favlist::{load_catalog, App, Config, Console};
use log::{info, warn};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("start program version {}", env!("CARGO_PKG_VERSION"));

    let config = Config::default();
    let catalog = load_catalog(&config.catalog_path).context("cannot start without a catalog")?;
    if let Err(err) = config.ensure_playlist_dir() {
        warn!("{err}");
    }

    let mut app = App::new(catalog, config, Console::stdio());
    app.run()
}
