use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use tokio::sync::mpsc;

use crate::catalog::StationCatalog;
use crate::directory::{Directory, IcecastDirectory};
use crate::player::RodioPlayer;
use crate::stream::HttpConnector;
use crate::supervisor::Supervisor;

mod catalog;
mod command;
mod directory;
mod player;
mod stream;
mod supervisor;

/// Terminal player for internet radio streams.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opt {
    /// Logging level
    #[clap(long, default_value = "error")]
    level: LevelFilter,

    /// Log file path (for debugging)
    #[clap(long, default_value = ".smoothplayer.log")]
    log_file: String,

    /// Station directory page address
    #[clap(long, default_value = "https://ice-sov.musicradio.com")]
    directory_url: String,

    /// Stream played on startup
    #[clap(long, default_value = "https://ice-sov.musicradio.com/ClassicFMMP3")]
    stream_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    let log_file = fs::File::create(&opt.log_file).context("can't open log file")?;

    simplelog::WriteLogger::init(opt.level, simplelog::Config::default(), log_file)
        .context("init logger")?;

    let directory = IcecastDirectory::new(&opt.directory_url);
    let records = directory.fetch().await.context("fetch station directory")?;
    let catalog = Arc::new(StationCatalog::new(records));

    if catalog.is_empty() {
        bail!("no playable stations found at {}", opt.directory_url);
    }

    command::print_stations(&catalog);
    command::print_help();

    let player = RodioPlayer::new().context("init audio output")?;

    let (events_tx, events_rx) = mpsc::channel(8);
    supervisor::spawn_command_loop(catalog, events_tx);

    Supervisor::new(player, HttpConnector).run(&opt.stream_url, events_rx).await
}
