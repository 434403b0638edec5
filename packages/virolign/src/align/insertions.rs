use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A run of query letters aligned against reference gaps: an insertion relative to the
/// reference. `pos` is the reference position immediately after which the run occurs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insertion<L: Letter<L>> {
  pub pos: usize,
  pub length: usize,
  #[serde(with = "crate::io::letter::serde_seq")]
  #[schemars(with = "String")]
  pub ins: Vec<L>,
}

pub type NucIns = Insertion<Nuc>;

#[derive(Clone, Debug)]
pub struct StripInsertionsResult<L: Letter<L>> {
  pub qry_seq: Vec<L>,
  pub ref_seq: Vec<L>,
  pub insertions: Vec<Insertion<L>>,
}

/// Removes insertions from both aligned sequences, recording them separately.
///
/// After stripping, positions in the aligned pair are reference positions, which is what
/// all of the downstream mutation logic relies on.
pub fn strip_insertions<L: Letter<L>>(qry_aln: &[L], ref_aln: &[L]) -> StripInsertionsResult<L> {
  debug_assert_eq!(qry_aln.len(), ref_aln.len());

  let mut qry_stripped = Vec::<L>::with_capacity(ref_aln.len());
  let mut ref_stripped = Vec::<L>::with_capacity(ref_aln.len());
  let mut insertions = Vec::<Insertion<L>>::new();

  let mut insertion_start: Option<usize> = None;
  let mut current_insertion = Vec::<L>::new();
  let mut ref_pos = 0;

  for i in 0..ref_aln.len() {
    if ref_aln[i].is_gap() {
      if insertion_start.is_none() {
        insertion_start = Some(ref_pos);
      }
      current_insertion.push(qry_aln[i]);
    } else {
      if let Some(pos) = insertion_start.take() {
        insertions.push(Insertion {
          pos,
          length: current_insertion.len(),
          ins: std::mem::take(&mut current_insertion),
        });
      }
      qry_stripped.push(qry_aln[i]);
      ref_stripped.push(ref_aln[i]);
      ref_pos += 1;
    }
  }

  if let Some(pos) = insertion_start {
    insertions.push(Insertion {
      pos,
      length: current_insertion.len(),
      ins: current_insertion,
    });
  }

  StripInsertionsResult {
    qry_seq: qry_stripped,
    ref_seq: ref_stripped,
    insertions,
  }
}
