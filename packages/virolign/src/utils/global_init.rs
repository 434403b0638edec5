use eyre::Report;
use log::LevelFilter;

/// Installs the global error report handler. Call once, at the start of the process.
pub fn global_init() -> Result<(), Report> {
  color_eyre::config::HookBuilder::default()
    .panic_section("Virolign encountered an unexpected error and had to stop.")
    .install()
}

pub fn setup_logger(filter_level: LevelFilter) {
  env_logger::Builder::new()
    .filter_level(filter_level)
    .format_timestamp(None)
    .init();
}
