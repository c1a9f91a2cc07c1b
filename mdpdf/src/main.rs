use std::io::{self, IsTerminal, Write};

use color_eyre::eyre::{Context, Result};
use log::LevelFilter;
use mdpdf::{cli::Cli, config::ConversionOptions};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .parse_default_env()
    .init();

  let options =
    ConversionOptions::load(&cli).wrap_err("Failed to load configuration")?;
  let written = mdpdf::convert(options).wrap_err_with(|| {
    format!("Failed to convert {}", cli.source.display())
  })?;

  let mut stdout = io::stdout().lock();
  if stdout.is_terminal() {
    writeln!(stdout, "PDF written to {}", written.display())?;
  } else {
    // Plain path for scripts.
    writeln!(stdout, "{}", written.display())?;
  }
  Ok(())
}
