use crate::tree::tree::{AuspiceTreeNode, Tree, TreeBranchAttrs, TreeNodeAttr, TreeNodeAttrs};
use crate::types::outputs::AnalysisResult;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Attaches analyzed queries as new leaves of the tree, each under its nearest node.
///
/// The tree is read-only while the analysis is running; this reshaping happens afterwards,
/// in a single-threaded pass over the collected results. Queries with fewer private
/// mutations are attached first, and ties are resolved by the original input order, so
/// that the output does not depend on worker scheduling.
pub fn tree_attach_new_nodes(tree: &mut Tree, results: &[AnalysisResult]) {
  let sorted = results
    .iter()
    .sorted_by_key(|result| (result.private_mutations.len(), result.index))
    .collect_vec();

  for result in sorted {
    tree_attach_new_node(tree, result);
  }
}

fn tree_attach_new_node(tree: &mut Tree, result: &AnalysisResult) {
  let mut mutations = BTreeMap::<String, Vec<String>>::new();
  mutations.insert(
    "nuc".to_owned(),
    result.private_mutations.iter().sorted().map(ToString::to_string).collect(),
  );

  // New leaves are labelled with the query's aminoacid substitutions relative to the
  // reference, grouped per gene
  for (gene_name, aa_subs) in &result
    .aa_substitutions
    .iter()
    .chunk_by(|aa_sub| aa_sub.gene.clone())
  {
    mutations.insert(gene_name, aa_subs.sorted().map(|aa_sub| aa_sub.to_string_without_gene()).collect());
  }

  let payload = AuspiceTreeNode {
    name: format!("{}_new", result.seq_name),
    branch_attrs: TreeBranchAttrs {
      mutations,
      ..TreeBranchAttrs::default()
    },
    node_attrs: TreeNodeAttrs {
      clade_membership: Some(TreeNodeAttr::new(&result.clade)),
      ..TreeNodeAttrs::default()
    },
    children: vec![],
    other: serde_json::Value::Object(serde_json::Map::new()),
  };

  tree.add_child(result.nearest_node_id, payload);
}
