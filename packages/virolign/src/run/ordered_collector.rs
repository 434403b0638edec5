use crate::io::fs::create_file;
use crate::types::outputs::{AnalysisError, AnalysisResult, ResultsJson};
use eyre::{Report, WrapErr};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome of one query, as it travels from a worker to the collector
#[derive(Clone, Debug)]
pub enum AnalysisOutput {
  Result(AnalysisResult),
  Error(AnalysisError),
}

impl AnalysisOutput {
  pub const fn index(&self) -> usize {
    match self {
      AnalysisOutput::Result(result) => result.index,
      AnalysisOutput::Error(error) => error.index,
    }
  }
}

/// Collects per-query outputs from workers, optionally restoring the input order.
///
/// Workers may complete out of order. When in-order output is requested, records are
/// buffered until all their predecessors (by input index) have arrived.
pub struct OrderedCollector {
  in_order: bool,
  expected_index: usize,
  buffer: BTreeMap<usize, AnalysisOutput>,
  results: Vec<AnalysisResult>,
  errors: Vec<AnalysisError>,
  ndjson_writer: Option<BufWriter<File>>,
}

impl OrderedCollector {
  pub fn new(in_order: bool, output_ndjson: Option<&Path>) -> Result<Self, Report> {
    let ndjson_writer = output_ndjson.map(create_file).transpose()?;
    Ok(Self {
      in_order,
      expected_index: 0,
      buffer: BTreeMap::new(),
      results: vec![],
      errors: vec![],
      ndjson_writer,
    })
  }

  pub fn add(&mut self, output: AnalysisOutput) -> Result<(), Report> {
    if !self.in_order {
      return self.emit(output);
    }

    self.buffer.insert(output.index(), output);
    while let Some(output) = self.buffer.remove(&self.expected_index) {
      self.emit(output)?;
      self.expected_index += 1;
    }
    Ok(())
  }

  fn emit(&mut self, output: AnalysisOutput) -> Result<(), Report> {
    if let Some(writer) = &mut self.ndjson_writer {
      let line = match &output {
        AnalysisOutput::Result(result) => serde_json::to_string(result),
        AnalysisOutput::Error(error) => serde_json::to_string(error),
      }
      .wrap_err("When serializing NDJSON record")?;
      writeln!(writer, "{line}").wrap_err("When writing NDJSON record")?;
    }

    match output {
      AnalysisOutput::Result(result) => self.results.push(result),
      AnalysisOutput::Error(error) => self.errors.push(error),
    }
    Ok(())
  }

  pub fn finish(mut self) -> Result<ResultsJson, Report> {
    // Flush whatever is left: with gap-free input indices the buffer is already empty
    let remaining = std::mem::take(&mut self.buffer);
    for (_, output) in remaining {
      self.emit(output)?;
    }
    if let Some(writer) = &mut self.ndjson_writer {
      writer.flush().wrap_err("When flushing NDJSON output")?;
    }
    Ok(ResultsJson {
      results: self.results,
      errors: self.errors,
    })
  }
}
