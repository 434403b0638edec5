use crate::analyze::nuc_sub::NucSub;
use crate::io::aa::Aa;
use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::make_error;
use eyre::{Report, WrapErr};
use regex::Regex;
use std::sync::OnceLock;

fn nuc_mutation_regex() -> &'static Regex {
  static REGEX: OnceLock<Regex> = OnceLock::new();
  REGEX.get_or_init(|| Regex::new(r"^(?P<ref>[A-Z-])(?P<pos>\d{1,10})(?P<qry>[A-Z-])$").expect("Invalid regex"))
}

fn aa_mutation_regex() -> &'static Regex {
  static REGEX: OnceLock<Regex> = OnceLock::new();
  REGEX.get_or_init(|| Regex::new(r"^(?P<ref>[A-Z*-])(?P<pos>\d{1,10})(?P<qry>[A-Z*-])$").expect("Invalid regex"))
}

/// Positions are 1-based on the wire and 0-based internally
fn parse_position(raw: &str) -> Result<usize, Report> {
  let pos: usize = raw
    .parse()
    .wrap_err_with(|| format!("Unable to parse position: \"{raw}\""))?;
  if pos < 1 {
    return make_error!("Expected a 1-based position, but got: \"{raw}\"");
  }
  Ok(pos - 1)
}

/// Parses a nucleotide mutation from its string representation, e.g. `A123T`.
/// Case-insensitive; `-` is permitted for gap.
pub fn parse_nuc_mutation(mutation_str: &str) -> Result<NucSub, Report> {
  let upper = mutation_str.trim().to_uppercase();
  let captures = nuc_mutation_regex()
    .captures(&upper)
    .ok_or_else(|| eyre::eyre!("Unable to parse nucleotide mutation. The format is invalid: \"{mutation_str}\""))?;

  let reff = Nuc::from_char(captures["ref"].chars().next().expect("Regex guarantees one character"))
    .wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;
  let pos = parse_position(&captures["pos"]).wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;
  let qry = Nuc::from_char(captures["qry"].chars().next().expect("Regex guarantees one character"))
    .wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;

  Ok(NucSub::new(reff, pos, qry))
}

/// Aminoacid mutation without a gene, e.g. `V67L` or `Q493*`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AaMutParsed {
  pub reff: Aa,
  pub pos: usize,
  pub qry: Aa,
}

/// Parses an aminoacid mutation from its string representation, e.g. `V67L`.
/// Case-insensitive; `*` is permitted for stop, `-` for gap.
pub fn parse_aa_mutation_without_gene(mutation_str: &str) -> Result<AaMutParsed, Report> {
  let upper = mutation_str.trim().to_uppercase();
  let captures = aa_mutation_regex()
    .captures(&upper)
    .ok_or_else(|| eyre::eyre!("Unable to parse aminoacid mutation. The format is invalid: \"{mutation_str}\""))?;

  let reff = Aa::from_char(captures["ref"].chars().next().expect("Regex guarantees one character"))
    .wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;
  let pos = parse_position(&captures["pos"]).wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;
  let qry = Aa::from_char(captures["qry"].chars().next().expect("Regex guarantees one character"))
    .wrap_err_with(|| format!("When parsing mutation \"{mutation_str}\""))?;

  Ok(AaMutParsed { reff, pos, qry })
}
