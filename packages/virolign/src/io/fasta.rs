use crate::make_error;
use eyre::{Report, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastaRecord {
  pub seq_name: String,
  pub seq: String,
  pub index: usize,
}

impl FastaRecord {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn clear(&mut self) {
    self.seq_name.clear();
    self.seq.clear();
    self.index = 0;
  }

  pub fn is_empty(&self) -> bool {
    self.seq_name.is_empty() && self.seq.is_empty()
  }
}

pub struct FastaReader<R: BufRead> {
  reader: R,
  line: String,
  index: usize,
}

impl FastaReader<BufReader<File>> {
  pub fn from_path(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    let filepath = filepath.as_ref();
    let file = File::open(filepath).wrap_err_with(|| format!("When opening FASTA file: {filepath:#?}"))?;
    Ok(Self::new(BufReader::new(file)))
  }
}

impl<R: BufRead> FastaReader<R> {
  pub fn new(reader: R) -> Self {
    Self {
      reader,
      line: String::new(),
      index: 0,
    }
  }

  fn next_line(&mut self) -> Result<bool, Report> {
    self.line.clear();
    let n_bytes = self.reader.read_line(&mut self.line).wrap_err("When reading a FASTA line")?;
    Ok(n_bytes > 0)
  }

  /// Reads the next record. On end of input the record is left empty.
  ///
  /// Sequences are uppercased on ingest.
  pub fn read(&mut self, record: &mut FastaRecord) -> Result<(), Report> {
    record.clear();

    // Find the next header line
    loop {
      if self.line.trim_start().starts_with('>') {
        break;
      }
      if !self.next_line()? {
        return Ok(());
      }
    }

    record.seq_name = self.line.trim().trim_start_matches('>').trim().to_owned();

    loop {
      if !self.next_line()? {
        break;
      }
      if self.line.trim_start().starts_with('>') {
        break;
      }
      let fragment = self.line.trim();
      record.seq.push_str(&fragment.to_ascii_uppercase());
    }

    record.index = self.index;
    self.index += 1;

    Ok(())
  }
}

/// Reads a FASTA file that is expected to contain exactly one sequence (e.g. the reference)
pub fn read_one_fasta(filepath: impl AsRef<Path>) -> Result<FastaRecord, Report> {
  let filepath = filepath.as_ref();
  let mut reader = FastaReader::from_path(filepath)?;
  let mut record = FastaRecord::default();
  reader.read(&mut record)?;
  if record.is_empty() {
    return make_error!("No sequences found in FASTA file: {filepath:#?}");
  }
  Ok(record)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn read_all(input: &str) -> Result<Vec<FastaRecord>, Report> {
    let mut reader = FastaReader::new(input.as_bytes());
    let mut records = vec![];
    loop {
      let mut record = FastaRecord::default();
      reader.read(&mut record)?;
      if record.is_empty() {
        break;
      }
      records.push(record);
    }
    Ok(records)
  }

  #[rstest]
  fn reads_multiple_records() -> Result<(), Report> {
    let records = read_all(">seq one\nACGT\nacgt\n\n>seq two\nTTTT\n")?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].seq_name, "seq one");
    assert_eq!(records[0].seq, "ACGTACGT");
    assert_eq!(records[0].index, 0);
    assert_eq!(records[1].seq_name, "seq two");
    assert_eq!(records[1].seq, "TTTT");
    assert_eq!(records[1].index, 1);
    Ok(())
  }

  #[rstest]
  fn uppercases_on_ingest() -> Result<(), Report> {
    let records = read_all(">s\nacgtn\n")?;
    assert_eq!(records[0].seq, "ACGTN");
    Ok(())
  }

  #[rstest]
  fn handles_empty_input() -> Result<(), Report> {
    let records = read_all("")?;
    assert_eq!(records.len(), 0);
    Ok(())
  }
}
