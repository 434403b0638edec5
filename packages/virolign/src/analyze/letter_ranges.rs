use crate::io::letter::Letter;
use crate::io::nuc::Nuc;
use crate::utils::range::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous run of one particular letter
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LetterRange<L: Letter<L>> {
  pub begin: usize,
  pub end: usize,
  pub letter: L,
}

impl<L: Letter<L>> LetterRange<L> {
  pub fn len(&self) -> usize {
    self.end - self.begin
  }

  pub fn contains(&self, pos: usize) -> bool {
    pos >= self.begin && pos < self.end
  }

  pub fn range(&self) -> Range {
    Range::new(self.begin, self.end)
  }
}

pub type NucRange = LetterRange<Nuc>;

/// Finds all contiguous runs of the given letter
pub fn find_letter_ranges<L: Letter<L>>(seq: &[L], letter: L) -> Vec<LetterRange<L>> {
  let mut ranges = Vec::<LetterRange<L>>::new();
  let mut begin: Option<usize> = None;

  for (pos, &current) in seq.iter().enumerate() {
    if current == letter {
      if begin.is_none() {
        begin = Some(pos);
      }
    } else if let Some(range_begin) = begin.take() {
      ranges.push(LetterRange {
        begin: range_begin,
        end: pos,
        letter,
      });
    }
  }

  if let Some(range_begin) = begin {
    ranges.push(LetterRange {
      begin: range_begin,
      end: seq.len(),
      letter,
    });
  }

  ranges
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::nuc::to_nuc_seq;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn finds_runs_in_the_middle() -> Result<(), Report> {
    let seq = to_nuc_seq("ACNNNTGNNA")?;
    let ranges = find_letter_ranges(&seq, Nuc::N);
    assert_eq!(
      ranges,
      vec![
        LetterRange { begin: 2, end: 5, letter: Nuc::N },
        LetterRange { begin: 7, end: 9, letter: Nuc::N },
      ]
    );
    Ok(())
  }

  #[rstest]
  fn finds_run_at_the_end() -> Result<(), Report> {
    let seq = to_nuc_seq("ACGNN")?;
    let ranges = find_letter_ranges(&seq, Nuc::N);
    assert_eq!(ranges, vec![LetterRange { begin: 3, end: 5, letter: Nuc::N }]);
    Ok(())
  }

  #[rstest]
  fn finds_nothing_when_absent() -> Result<(), Report> {
    let seq = to_nuc_seq("ACGT")?;
    assert_eq!(find_letter_ranges(&seq, Nuc::N), vec![]);
    Ok(())
  }
}
