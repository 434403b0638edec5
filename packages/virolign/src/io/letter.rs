use eyre::Report;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt::Debug;
use std::hash::Hash;

/// Capabilities common to all sequence letters (nucleotides and amino acids):
/// gap logic, conversion to and from characters
pub trait Letter<L>: Copy + Debug + Eq + Ord + Hash {
  const GAP: L;
  const UNKNOWN: L;

  fn is_gap(&self) -> bool;

  fn is_unknown(&self) -> bool;

  fn from_char(c: char) -> Result<L, Report>;

  fn to_char(&self) -> char;
}

pub fn to_seq<L: Letter<L>>(s: &str) -> Result<Vec<L>, Report> {
  s.chars().map(L::from_char).collect()
}

pub fn from_seq<L: Letter<L>>(seq: &[L]) -> String {
  seq.iter().map(Letter::to_char).collect()
}

/// Displays a letter the way it appears in reports: single-quoted
pub fn format_letter<L: Letter<L>>(letter: &L) -> String {
  format!("'{}'", letter.to_char())
}

/// Displays a sequence the way it appears in reports: double-quoted
pub fn format_seq<L: Letter<L>>(seq: &[L]) -> String {
  format!("\"{}\"", from_seq(seq))
}

/// Serializes sequences as plain strings.
///
/// Usage: add attribute `#[serde(with = "crate::io::letter::serde_seq")]` to a `Vec<L>` field
pub mod serde_seq {
  use super::{from_seq, to_seq, Letter};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer, L: Letter<L>>(seq: &[L], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&from_seq(seq))
  }

  pub fn deserialize<'de, D: Deserializer<'de>, L: Letter<L>>(deserializer: D) -> Result<Vec<L>, D::Error> {
    let s = String::deserialize(deserializer)?;
    to_seq(&s).map_err(serde::de::Error::custom)
  }
}

pub fn serialize_letter<S: Serializer, L: Letter<L>>(letter: &L, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&letter.to_char().to_string())
}

pub fn deserialize_letter<'de, D: Deserializer<'de>, L: Letter<L>>(deserializer: D) -> Result<L, D::Error> {
  let s = String::deserialize(deserializer)?;
  let c = s
    .chars()
    .exactly_one()
    .map_err(|_| serde::de::Error::custom(format!("Expected exactly one character, but got: \"{s}\"")))?;
  L::from_char(c).map_err(serde::de::Error::custom)
}
