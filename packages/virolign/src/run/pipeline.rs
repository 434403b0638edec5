use crate::align::align::AlignmentScratch;
use crate::align::params::AlignPairwiseParams;
use crate::gene::gene_map::GeneMap;
use crate::io::fasta::{read_one_fasta, FastaReader, FastaRecord};
use crate::io::fs::read_file_to_string;
use crate::io::json::{json_parse, json_write};
use crate::io::nuc::to_nuc_seq;
use crate::run::ordered_collector::{AnalysisOutput, OrderedCollector};
use crate::run::virolign::Virolign;
use crate::tree::tree::AuspiceTree;
use crate::tree::tree_attach_new_nodes::tree_attach_new_nodes;
use crate::tree::tree_preprocess::tree_preprocess;
use crate::types::outputs::{AnalysisError, AnalysisStage, ResultsJson};
use crate::utils::error::report_to_string;
use crossbeam::thread;
use eyre::{eyre, Report, WrapErr};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything the run loop needs, already resolved by the caller (e.g. the CLI)
#[derive(Clone, Debug)]
pub struct VirolignRunArgs {
  pub input_fasta: PathBuf,
  pub input_ref: PathBuf,
  pub input_tree: PathBuf,
  pub input_gene_map: Option<PathBuf>,
  pub genes: Option<Vec<String>>,
  pub output_json: Option<PathBuf>,
  pub output_ndjson: Option<PathBuf>,
  pub output_tree: Option<PathBuf>,
  pub jobs: usize,
  pub in_order: bool,
  pub params: AlignPairwiseParams,
}

const CHANNEL_SIZE: usize = 128;

/// Runs the whole analysis: reads inputs, processes queries in parallel, attaches the
/// analyzed queries to the tree and writes the outputs.
///
/// Queries are data-parallel: a reader thread streams the FASTA, a fixed pool of workers
/// analyzes one query at a time, and a collector reassembles the outputs. Cancellation is
/// cooperative, polled at task boundaries; in-flight queries run to completion.
pub fn virolign_run(args: VirolignRunArgs) -> Result<(), Report> {
  info!("Run arguments:\n{args:#?}");

  let ref_record = read_one_fasta(&args.input_ref)?;
  let ref_seq = to_nuc_seq(&ref_record.seq).wrap_err("When reading the reference sequence")?;

  let gene_map = match &args.input_gene_map {
    Some(input_gene_map) => {
      let gene_map = GeneMap::from_file(input_gene_map)?;
      match &args.genes {
        Some(genes) => gene_map.filter_genes(genes)?,
        None => gene_map,
      }
    }
    None => {
      warn!("No gene map provided: translation, aminoacid mutations and frame shifts will be skipped");
      GeneMap::new()
    }
  };

  let auspice: AuspiceTree = json_parse(&read_file_to_string(&args.input_tree)?)
    .wrap_err_with(|| format!("When parsing reference tree file: {:#?}", args.input_tree))?;
  let tree = tree_preprocess(auspice, &ref_seq).wrap_err("When preprocessing the reference tree")?;

  let mut virolign = Virolign::new(ref_seq, gene_map, tree, args.params.clone())?;

  let mut collected: Option<Result<ResultsJson, Report>> = None;

  thread::scope(|s| {
    let (fasta_sender, fasta_receiver) = crossbeam_channel::bounded::<FastaRecord>(CHANNEL_SIZE);
    let (result_sender, result_receiver) = crossbeam_channel::bounded::<AnalysisOutput>(CHANNEL_SIZE);

    let cancelled = Arc::new(AtomicBool::new(false));
    let virolign = &virolign;

    {
      let cancelled = Arc::clone(&cancelled);
      let input_fasta = args.input_fasta.clone();
      s.spawn(move |_| {
        let mut reader = FastaReader::from_path(&input_fasta)
          .wrap_err("When opening input FASTA")
          .unwrap();
        loop {
          if cancelled.load(Ordering::Relaxed) {
            break;
          }
          let mut record = FastaRecord::default();
          reader.read(&mut record).wrap_err("When reading input FASTA").unwrap();
          if record.is_empty() {
            break;
          }
          if fasta_sender.send(record).is_err() {
            break;
          }
        }
        drop(fasta_sender);
      });
    }

    for _ in 0..args.jobs.max(1) {
      let fasta_receiver = fasta_receiver.clone();
      let result_sender = result_sender.clone();
      let cancelled = Arc::clone(&cancelled);

      s.spawn(move |_| {
        let mut scratch = AlignmentScratch::new();

        for FastaRecord { seq_name, seq, index } in &fasta_receiver {
          if cancelled.load(Ordering::Relaxed) {
            break;
          }
          info!("Processing sequence '{seq_name}'");

          let output = match to_nuc_seq(&seq) {
            Err(report) => AnalysisOutput::Error(AnalysisError {
              seq_name: seq_name.clone(),
              index,
              stage: AnalysisStage::Ingest,
              error: report_to_string(&report),
            }),
            Ok(qry_seq) => match virolign.run_one(index, &seq_name, &qry_seq, &mut scratch) {
              Ok(result) => AnalysisOutput::Result(result),
              Err(failure) => {
                warn!(
                  "In sequence #{index} '{seq_name}': {}",
                  report_to_string(&failure.report)
                );
                AnalysisOutput::Error(AnalysisError {
                  seq_name: seq_name.clone(),
                  index,
                  stage: failure.stage,
                  error: report_to_string(&failure.report),
                })
              }
            },
          };

          // All records are sent, without skipping: the in-order collector expects a
          // contiguous stream of indices
          if result_sender.send(output).is_err() {
            break;
          }
        }

        drop(result_sender);
      });
    }

    // The initial sender and receiver clones are dropped here so that the channels
    // disconnect once the reader and all workers are done
    drop(fasta_receiver);
    drop(result_sender);

    {
      let cancelled = Arc::clone(&cancelled);
      let in_order = args.in_order;
      let output_ndjson = args.output_ndjson.clone();
      let collected = &mut collected;
      s.spawn(move |_| {
        *collected = Some(run_collector(in_order, output_ndjson, &result_receiver, &cancelled));
      });
    }
  })
  .map_err(|_| eyre!("A worker thread panicked"))?;

  let results_json = collected.ok_or_else(|| eyre!("The collector thread produced no output"))??;

  tree_attach_new_nodes(&mut virolign.tree, &results_json.results);

  if let Some(output_json) = &args.output_json {
    json_write(output_json, &results_json).wrap_err("When writing results")?;
  }

  if let Some(output_tree) = &args.output_tree {
    let auspice = virolign.tree.to_auspice()?;
    json_write(output_tree, &auspice).wrap_err("When writing the output tree")?;
  }

  info!(
    "Done: {} results, {} failed queries",
    results_json.results.len(),
    results_json.errors.len()
  );

  Ok(())
}

fn run_collector(
  in_order: bool,
  output_ndjson: Option<PathBuf>,
  result_receiver: &crossbeam_channel::Receiver<AnalysisOutput>,
  cancelled: &AtomicBool,
) -> Result<ResultsJson, Report> {
  let mut collector = OrderedCollector::new(in_order, output_ndjson.as_deref())?;
  for output in result_receiver {
    if let Err(report) = collector.add(output) {
      // An output failure is fatal: stop accepting new work, let in-flight queries finish
      cancelled.store(true, Ordering::Relaxed);
      return Err(report);
    }
  }
  collector.finish()
}
