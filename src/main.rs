mod game;
mod term;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use log::info;
use wrapsnake::config::GameConfig;

use game::{Flow, SnakeGame};

#[derive(Parser, Debug)]
#[command(name = "wrapsnake", version, about = "Wrap-around snake for the terminal")]
struct Args {
    /// YAML file with game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    /// Terminal columns per cell
    #[arg(long)]
    scale: Option<u16>,

    /// Milliseconds between steps
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement, random if not given
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_yaml_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width { config.width = width; }
        if let Some(height) = self.height { config.height = height; }
        if let Some(scale) = self.scale { config.scale = scale; }
        if let Some(tick_ms) = self.tick_ms { config.tick_interval_ms = tick_ms; }
        if let Some(seed) = self.seed { config.seed = Some(seed); }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let config = Args::parse().into_config()?;
    info!("config: {:?}", config);

    let mut game = SnakeGame::new(config)?;
    game.initialize()?;

    // Restore the terminal before any error gets reported
    let res = run(&mut game);
    game.restore()?;
    res
}

fn run(game: &mut SnakeGame) -> Result<()> {
    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    while game.play()? == Flow::Continue {}

    info!("quitting");
    Ok(())
}
