use anyhow::Result;
use clap::Parser;

use cube_sample::cli::Cli;
use cube_sample::config::AppConfig;
use cube_sample::{Engine, Game};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    let window_config = config.window.clone();

    println!("Cube Sample - Controls: WASD move, Space/Shift up/down, mouse look, F3 debug panel, Escape to quit");

    let game = Game::new(config, cli.debug);
    Engine::new(game, window_config, cli.mode.to_wgpu()).run()
}
