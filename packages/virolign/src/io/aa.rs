use crate::io::letter::{deserialize_letter, serialize_letter, Letter};
use crate::make_error;
use eyre::Report;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Amino acid: the 20 standard acids plus `X` (unknown), `*` (stop) and the gap column marker
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Aa {
  A,
  C,
  D,
  E,
  F,
  G,
  H,
  I,
  K,
  L,
  M,
  N,
  P,
  Q,
  R,
  S,
  T,
  V,
  W,
  Y,
  X,
  Stop,
  Gap,
}

impl Letter<Aa> for Aa {
  const GAP: Aa = Aa::Gap;
  const UNKNOWN: Aa = Aa::X;

  fn is_gap(&self) -> bool {
    matches!(self, Aa::Gap)
  }

  fn is_unknown(&self) -> bool {
    matches!(self, Aa::X)
  }

  fn from_char(c: char) -> Result<Aa, Report> {
    match c.to_ascii_uppercase() {
      'A' => Ok(Aa::A),
      'C' => Ok(Aa::C),
      'D' => Ok(Aa::D),
      'E' => Ok(Aa::E),
      'F' => Ok(Aa::F),
      'G' => Ok(Aa::G),
      'H' => Ok(Aa::H),
      'I' => Ok(Aa::I),
      'K' => Ok(Aa::K),
      'L' => Ok(Aa::L),
      'M' => Ok(Aa::M),
      'N' => Ok(Aa::N),
      'P' => Ok(Aa::P),
      'Q' => Ok(Aa::Q),
      'R' => Ok(Aa::R),
      'S' => Ok(Aa::S),
      'T' => Ok(Aa::T),
      'V' => Ok(Aa::V),
      'W' => Ok(Aa::W),
      'Y' => Ok(Aa::Y),
      'X' => Ok(Aa::X),
      '*' => Ok(Aa::Stop),
      '-' => Ok(Aa::Gap),
      _ => make_error!("Invalid aminoacid character: '{c}'"),
    }
  }

  fn to_char(&self) -> char {
    match self {
      Aa::A => 'A',
      Aa::C => 'C',
      Aa::D => 'D',
      Aa::E => 'E',
      Aa::F => 'F',
      Aa::G => 'G',
      Aa::H => 'H',
      Aa::I => 'I',
      Aa::K => 'K',
      Aa::L => 'L',
      Aa::M => 'M',
      Aa::N => 'N',
      Aa::P => 'P',
      Aa::Q => 'Q',
      Aa::R => 'R',
      Aa::S => 'S',
      Aa::T => 'T',
      Aa::V => 'V',
      Aa::W => 'W',
      Aa::Y => 'Y',
      Aa::X => 'X',
      Aa::Stop => '*',
      Aa::Gap => '-',
    }
  }
}

impl Serialize for Aa {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serialize_letter(self, serializer)
  }
}

impl<'de> Deserialize<'de> for Aa {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Aa, D::Error> {
    deserialize_letter(deserializer)
  }
}

impl JsonSchema for Aa {
  fn schema_name() -> String {
    "Aa".to_owned()
  }

  fn json_schema(generator: &mut SchemaGenerator) -> Schema {
    generator.subschema_for::<String>()
  }
}

pub fn to_aa(c: char) -> Result<Aa, Report> {
  Aa::from_char(c)
}

pub fn to_aa_seq(s: &str) -> Result<Vec<Aa>, Report> {
  crate::io::letter::to_seq(s)
}

pub fn from_aa_seq(seq: &[Aa]) -> String {
  crate::io::letter::from_seq(seq)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn converts_roundtrip() -> Result<(), Report> {
    let seq = to_aa_seq("ACDEFGHIKLMNPQRSTVWYX*-")?;
    assert_eq!(from_aa_seq(&seq), "ACDEFGHIKLMNPQRSTVWYX*-");
    Ok(())
  }

  #[rstest]
  fn rejects_invalid_characters() {
    assert!(to_aa('Z').is_err());
    assert!(to_aa('1').is_err());
  }
}
