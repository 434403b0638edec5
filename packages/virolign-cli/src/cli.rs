use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use eyre::Report;
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use virolign::align::params::{AlignPairwiseParams, AlignPairwiseParamsOptional};
use virolign::run::pipeline::{virolign_run, VirolignRunArgs};

#[derive(Parser, Debug)]
#[clap(name = "virolign")]
#[clap(author, version)]
#[clap(verbatim_doc_comment)]
/// Viral genome alignment, mutation calling and phylogenetic placement.
///
/// Aligns query sequences against a reference, translates genes, enumerates nucleotide
/// and aminoacid changes and attaches each query to its nearest node on a reference tree.
pub struct VirolignArgs {
  #[clap(subcommand)]
  pub command: VirolignCommands,

  /// Set verbosity level
  #[clap(long, global = true, conflicts_with = "silent")]
  #[clap(value_parser = ["off", "error", "warn", "info", "debug", "trace"])]
  pub verbosity: Option<String>,

  /// Disable all console output. Same as --verbosity=off
  #[clap(long, global = true, conflicts_with = "verbosity")]
  pub silent: bool,
}

#[derive(Subcommand, Debug)]
pub enum VirolignCommands {
  /// Generate shell completions.
  ///
  /// This will print the completions file contents to the console. Refer to your shell's documentation on how to install the completions.
  Completions {
    /// Name of the shell to generate appropriate completions
    #[clap(value_enum, default_value_t = Shell::Bash)]
    shell: Shell,
  },

  /// Run the analysis
  Run(Box<RunArgs>),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
  /// Path to a FASTA file with input sequences
  #[clap(long, short = 'i', alias("sequences"))]
  #[clap(value_hint = ValueHint::FilePath)]
  pub input_fasta: PathBuf,

  /// Path to a FASTA file containing the reference sequence.
  ///
  /// This file is expected to contain exactly 1 sequence.
  #[clap(long, short = 'r', alias("reference"))]
  #[clap(value_hint = ValueHint::FilePath)]
  pub input_ref: PathBuf,

  /// Path to a JSON file containing the reference tree
  #[clap(long, short = 'a')]
  #[clap(value_hint = ValueHint::FilePath)]
  pub input_tree: PathBuf,

  /// Path to a GFF3 file containing the gene map (genome annotation).
  ///
  /// If not supplied, sequences will not be translated and no aminoacid mutations or
  /// frame shifts will be reported.
  #[clap(long, short = 'm', alias = "genemap")]
  #[clap(value_hint = ValueHint::FilePath)]
  pub input_gene_map: Option<PathBuf>,

  /// Comma-separated list of names of genes to use.
  ///
  /// If not supplied, all genes of the gene map are used.
  #[clap(long, short = 'g', num_args=1.., use_value_delimiter = true)]
  pub genes: Option<Vec<String>>,

  /// Path to output JSON file with the results
  #[clap(long, short = 'o')]
  #[clap(value_hint = ValueHint::AnyPath)]
  pub output_json: Option<PathBuf>,

  /// Path to output NDJSON file: one result record per line, in the order of completion
  #[clap(long)]
  #[clap(value_hint = ValueHint::AnyPath)]
  pub output_ndjson: Option<PathBuf>,

  /// Path to output JSON file with the reference tree, with the analyzed sequences attached
  #[clap(long, short = 't')]
  #[clap(value_hint = ValueHint::AnyPath)]
  pub output_tree: Option<PathBuf>,

  /// Number of processing jobs. If not specified, all available CPU threads will be used.
  #[clap(long, short = 'j')]
  pub jobs: Option<usize>,

  /// Emit output records in the same order as the input sequences
  #[clap(long)]
  pub in_order: bool,

  #[clap(flatten)]
  pub alignment_params: AlignPairwiseParamsOptional,
}

pub fn parse_cli_args() -> VirolignArgs {
  VirolignArgs::parse()
}

pub fn log_level(args: &VirolignArgs) -> LevelFilter {
  if args.silent {
    return LevelFilter::Off;
  }
  args
    .verbosity
    .as_deref()
    .and_then(|verbosity| LevelFilter::from_str(verbosity).ok())
    .unwrap_or(LevelFilter::Warn)
}

pub fn generate_completions(shell: Shell) {
  let mut command = VirolignArgs::command();
  generate(shell, &mut command, "virolign", &mut io::stdout());
}

pub fn run(run_args: RunArgs) -> Result<(), Report> {
  let RunArgs {
    input_fasta,
    input_ref,
    input_tree,
    input_gene_map,
    genes,
    output_json,
    output_ndjson,
    output_tree,
    jobs,
    in_order,
    alignment_params,
  } = run_args;

  let mut params = AlignPairwiseParams::default();
  params.merge_opt(alignment_params);

  virolign_run(VirolignRunArgs {
    input_fasta,
    input_ref,
    input_tree,
    input_gene_map,
    genes,
    output_json,
    output_ndjson,
    output_tree,
    jobs: jobs.unwrap_or_else(num_cpus::get),
    in_order,
    params,
  })
}
