use crate::gene::gene::{Gene, GeneStrand};
use crate::gene::gene_map::GeneMap;
use crate::make_error;
use eyre::{Report, WrapErr};
use indexmap::IndexMap;
use log::warn;

/// Parses a GFF3-like genome annotation into a gene map.
///
/// Only rows with feature `gene` or `CDS` are considered. Coordinates on the wire are
/// 1-based, inclusive, and are converted to 0-based, half-open. The `gene_name` attribute
/// is recognized in both `key=value` and `key "value"` syntax. Lines starting with `#` are ignored.
pub fn parse_gene_map_gff(content: &str) -> Result<GeneMap, Report> {
  let mut genes = IndexMap::<String, Gene>::new();

  for (line_num, line) in content.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let gene = parse_gff_line(line).wrap_err_with(|| format!("When parsing genome annotation line {}", line_num + 1))?;

    if let Some(gene) = gene {
      if genes.contains_key(&gene.gene_name) {
        warn!(
          "Genome annotation contains duplicate entries for gene \"{}\". Only the first entry is used.",
          gene.gene_name
        );
        continue;
      }
      genes.insert(gene.gene_name.clone(), gene);
    }
  }

  Ok(GeneMap::from_genes(genes))
}

fn parse_gff_line(line: &str) -> Result<Option<Gene>, Report> {
  let columns: Vec<&str> = line.split('\t').collect();
  if columns.len() < 9 {
    return make_error!(
      "Expected a genome annotation row with 9 tab-separated columns, but found {}",
      columns.len()
    );
  }

  let feature = columns[2].trim();
  if feature != "gene" && feature != "CDS" {
    return Ok(None);
  }

  let start: usize = columns[3]
    .trim()
    .parse()
    .wrap_err_with(|| format!("When parsing gene start: \"{}\"", columns[3]))?;
  let end: usize = columns[4]
    .trim()
    .parse()
    .wrap_err_with(|| format!("When parsing gene end: \"{}\"", columns[4]))?;

  if start < 1 || end < start {
    return make_error!("Invalid gene range: start={start}, end={end} (expected 1 <= start <= end)");
  }

  let strand = match columns[6].trim() {
    "-" => GeneStrand::Reverse,
    _ => GeneStrand::Forward,
  };

  let frame: usize = match columns[7].trim() {
    "." => 0,
    frame_str => frame_str
      .parse()
      .wrap_err_with(|| format!("When parsing gene frame: \"{frame_str}\""))?,
  };

  let Some(gene_name) = parse_attribute(columns[8], "gene_name") else {
    return make_error!("The \"gene_name\" attribute is required, but was not found in: \"{}\"", columns[8]);
  };

  // To 0-based, half-open
  let start = start - 1;

  Ok(Some(Gene {
    gene_name,
    start,
    end,
    strand,
    frame,
    length: end - start,
  }))
}

/// Extracts an attribute value, accepting both `key=value` and `key "value"` syntax
fn parse_attribute(attributes: &str, key: &str) -> Option<String> {
  attributes.split(';').find_map(|attribute| {
    let rest = attribute.trim().strip_prefix(key)?;
    if !rest.starts_with('=') && !rest.starts_with(char::is_whitespace) {
      return None;
    }
    let value = rest.trim_start().strip_prefix('=').unwrap_or(rest).trim().trim_matches('"').trim();
    (!value.is_empty()).then(|| value.to_owned())
  })
}
