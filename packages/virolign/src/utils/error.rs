use eyre::Report;
use itertools::Itertools;

/// Flattens an error report chain into a single human-readable string
pub fn report_to_string(report: &Report) -> String {
  report.chain().map(ToString::to_string).join(": ")
}

#[macro_export]
macro_rules! make_report {
  ($($arg:tt)*) => {
    eyre::eyre!($($arg)*)
  };
}

#[macro_export]
macro_rules! make_error {
  ($($arg:tt)*) => {
    Err($crate::make_report!($($arg)*))
  };
}

/// Errors constructed with this macro signal bugs in the program itself, as opposed to invalid input data.
/// They should never be reachable on valid inputs.
#[macro_export]
macro_rules! make_internal_report {
  ($($arg:tt)*) => {
    eyre::eyre!(
      "{}. This is an internal error. Please report it to developers, providing data and parameters you used, in order to replicate the error.",
      format!($($arg)*)
    )
  };
}

#[macro_export]
macro_rules! make_internal_error {
  ($($arg:tt)*) => {
    Err($crate::make_internal_report!($($arg)*))
  };
}
