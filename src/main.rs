mod cli;
mod emulator;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = cli::Settings::from(cli::Args::parse());
    let mut emulator = emulator::Emulator::new(settings);

    emulator.run()
}
