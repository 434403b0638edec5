use crate::io::letter::{deserialize_letter, serialize_letter, Letter};
use crate::make_error;
use eyre::Report;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Nucleotide over the IUPAC alphabet, plus the gap column marker.
///
/// `N` and the partial ambiguity codes are distinguishable. The gap is not a nucleotide:
/// it only appears as a column marker in aligned sequences.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Nuc {
  A,
  C,
  G,
  T,
  R,
  Y,
  S,
  W,
  K,
  M,
  B,
  D,
  H,
  V,
  N,
  Gap,
}

impl Nuc {
  /// Canonical (unambiguous) nucleotides
  pub const fn is_acgt(self) -> bool {
    matches!(self, Nuc::A | Nuc::C | Nuc::G | Nuc::T)
  }

  /// Partial ambiguity codes. `N` is "fully unknown" and is not considered ambiguous.
  pub const fn is_ambiguous(self) -> bool {
    matches!(
      self,
      Nuc::R | Nuc::Y | Nuc::S | Nuc::W | Nuc::K | Nuc::M | Nuc::B | Nuc::D | Nuc::H | Nuc::V
    )
  }

  /// Canonical nucleotides consistent with this code
  pub const fn disambiguate(self) -> &'static [Nuc] {
    match self {
      Nuc::A => &[Nuc::A],
      Nuc::C => &[Nuc::C],
      Nuc::G => &[Nuc::G],
      Nuc::T => &[Nuc::T],
      Nuc::R => &[Nuc::A, Nuc::G],
      Nuc::Y => &[Nuc::C, Nuc::T],
      Nuc::S => &[Nuc::C, Nuc::G],
      Nuc::W => &[Nuc::A, Nuc::T],
      Nuc::K => &[Nuc::G, Nuc::T],
      Nuc::M => &[Nuc::A, Nuc::C],
      Nuc::B => &[Nuc::C, Nuc::G, Nuc::T],
      Nuc::D => &[Nuc::A, Nuc::G, Nuc::T],
      Nuc::H => &[Nuc::A, Nuc::C, Nuc::T],
      Nuc::V => &[Nuc::A, Nuc::C, Nuc::G],
      Nuc::N => &[Nuc::A, Nuc::C, Nuc::G, Nuc::T],
      Nuc::Gap => &[],
    }
  }

  /// Whether the sets of canonical nucleotides consistent with the two codes overlap.
  /// Gaps are compatible with nothing.
  pub fn is_compatible_with(self, other: Nuc) -> bool {
    self
      .disambiguate()
      .iter()
      .any(|candidate| other.disambiguate().contains(candidate))
  }
}

impl Letter<Nuc> for Nuc {
  const GAP: Nuc = Nuc::Gap;
  const UNKNOWN: Nuc = Nuc::N;

  fn is_gap(&self) -> bool {
    matches!(self, Nuc::Gap)
  }

  fn is_unknown(&self) -> bool {
    matches!(self, Nuc::N)
  }

  fn from_char(c: char) -> Result<Nuc, Report> {
    match c.to_ascii_uppercase() {
      'A' => Ok(Nuc::A),
      'C' => Ok(Nuc::C),
      'G' => Ok(Nuc::G),
      // RNA input is accepted and mapped to the DNA alphabet
      'T' | 'U' => Ok(Nuc::T),
      'R' => Ok(Nuc::R),
      'Y' => Ok(Nuc::Y),
      'S' => Ok(Nuc::S),
      'W' => Ok(Nuc::W),
      'K' => Ok(Nuc::K),
      'M' => Ok(Nuc::M),
      'B' => Ok(Nuc::B),
      'D' => Ok(Nuc::D),
      'H' => Ok(Nuc::H),
      'V' => Ok(Nuc::V),
      'N' => Ok(Nuc::N),
      '-' => Ok(Nuc::Gap),
      _ => make_error!("Invalid nucleotide character: '{c}'"),
    }
  }

  fn to_char(&self) -> char {
    match self {
      Nuc::A => 'A',
      Nuc::C => 'C',
      Nuc::G => 'G',
      Nuc::T => 'T',
      Nuc::R => 'R',
      Nuc::Y => 'Y',
      Nuc::S => 'S',
      Nuc::W => 'W',
      Nuc::K => 'K',
      Nuc::M => 'M',
      Nuc::B => 'B',
      Nuc::D => 'D',
      Nuc::H => 'H',
      Nuc::V => 'V',
      Nuc::N => 'N',
      Nuc::Gap => '-',
    }
  }
}

impl Serialize for Nuc {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serialize_letter(self, serializer)
  }
}

impl<'de> Deserialize<'de> for Nuc {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Nuc, D::Error> {
    deserialize_letter(deserializer)
  }
}

impl JsonSchema for Nuc {
  fn schema_name() -> String {
    "Nuc".to_owned()
  }

  fn json_schema(generator: &mut SchemaGenerator) -> Schema {
    generator.subschema_for::<String>()
  }
}

pub fn to_nuc(c: char) -> Result<Nuc, Report> {
  Nuc::from_char(c)
}

pub fn to_nuc_seq(s: &str) -> Result<Vec<Nuc>, Report> {
  crate::io::letter::to_seq(s)
}

pub fn from_nuc_seq(seq: &[Nuc]) -> String {
  crate::io::letter::from_seq(seq)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn converts_roundtrip() -> Result<(), Report> {
    let seq = to_nuc_seq("ACGTRYSWKMBDHVN-")?;
    assert_eq!(from_nuc_seq(&seq), "ACGTRYSWKMBDHVN-");
    Ok(())
  }

  #[rstest]
  fn maps_rna_to_dna() -> Result<(), Report> {
    assert_eq!(to_nuc('U')?, Nuc::T);
    assert_eq!(to_nuc('u')?, Nuc::T);
    Ok(())
  }

  #[rstest]
  fn rejects_invalid_characters() {
    assert!(to_nuc('J').is_err());
    assert!(to_nuc('?').is_err());
  }

  #[rstest]
  #[case(Nuc::A, Nuc::A, true)]
  #[case(Nuc::A, Nuc::G, false)]
  #[case(Nuc::R, Nuc::A, true)]
  #[case(Nuc::R, Nuc::C, false)]
  #[case(Nuc::N, Nuc::T, true)]
  #[case(Nuc::Gap, Nuc::A, false)]
  fn checks_compatibility(#[case] left: Nuc, #[case] right: Nuc, #[case] expected: bool) {
    assert_eq!(left.is_compatible_with(right), expected);
    assert_eq!(right.is_compatible_with(left), expected);
  }
}
