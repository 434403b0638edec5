mod cli;

use crate::cli::{generate_completions, log_level, parse_cli_args, run, VirolignCommands};
use eyre::Report;
use virolign::utils::global_init::{global_init, setup_logger};

fn main() -> Result<(), Report> {
  global_init()?;

  let args = parse_cli_args();
  setup_logger(log_level(&args));

  match args.command {
    VirolignCommands::Completions { shell } => {
      generate_completions(shell);
      Ok(())
    }
    VirolignCommands::Run(run_args) => run(*run_args),
  }
}
