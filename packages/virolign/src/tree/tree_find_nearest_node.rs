use crate::analyze::letter_ranges::NucRange;
use crate::analyze::nuc_del::NucDel;
use crate::analyze::nuc_sub::NucSub;
use crate::io::nuc::Nuc;
use crate::tree::tree::{Tree, TreeNode, TreeNodeKey};
use crate::utils::range::Range;
use itertools::Itertools;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct TreeFindNearestNodeOutput {
  pub nearest_node_key: TreeNodeKey,
  pub nearest_node_name: String,
  pub clade: String,
  pub private_mutations: Vec<NucSub>,
}

/// Finds the tree node with the fewest private mutations relative to the query and the
/// query's private substitutions relative to that node.
///
/// The distance is the size of the symmetric difference between the query's substitution
/// set and the node's root-to-node substitution set. Shared mutations cancel; disagreements
/// and additions on either side count. Node mutations at positions the query did not
/// sequence (outside the alignment range, missing, or deleted) are skipped.
///
/// Ties are broken in favor of the deeper node, then the lexicographically smaller clade
/// label, then the earlier node in preorder.
pub fn tree_find_nearest_node(
  tree: &Tree,
  substitutions: &[NucSub],
  deletions: &[NucDel],
  missing: &[NucRange],
  alignment_range: &Range,
) -> TreeFindNearestNodeOutput {
  let qry_subs: BTreeMap<usize, Nuc> = substitutions.iter().map(|sub| (sub.pos, sub.qry)).collect();

  let is_sequenced = |pos: usize| -> bool {
    alignment_range.contains(pos)
      && !missing.iter().any(|range| range.contains(pos))
      && !deletions.iter().any(|del| del.range().contains(pos))
  };

  let mut best_key = Tree::ROOT_KEY;
  let mut best_distance = node_distance(tree.root(), &qry_subs, &is_sequenced);

  // Preorder traversal with an explicit stack. A subtree is pruned when even the most
  // favorable run of mutations below the node cannot bring the distance under the best.
  let mut stack: Vec<TreeNodeKey> = vec![Tree::ROOT_KEY];
  while let Some(key) = stack.pop() {
    let node = tree.get(key);
    let distance = node_distance(node, &qry_subs, &is_sequenced);

    if is_better(tree, (distance, key), (best_distance, best_key)) {
      best_distance = distance;
      best_key = key;
    }

    if distance <= best_distance + node.max_muts_below {
      for &child in node.children.iter().rev() {
        stack.push(child);
      }
    }
  }

  let nearest_node = tree.get(best_key);
  let private_mutations = substitutions
    .iter()
    .filter(|sub| nearest_node.substitutions.get(&sub.pos) != Some(&sub.qry))
    .map(NucSub::unlinked)
    .collect_vec();

  TreeFindNearestNodeOutput {
    nearest_node_key: best_key,
    nearest_node_name: nearest_node.payload.name.clone(),
    clade: nearest_node.clade(),
    private_mutations,
  }
}

fn node_distance(node: &TreeNode, qry_subs: &BTreeMap<usize, Nuc>, is_sequenced: &impl Fn(usize) -> bool) -> usize {
  let mut shared = 0;
  let mut node_only = 0;

  for (&pos, &nuc) in &node.substitutions {
    if !is_sequenced(pos) {
      continue;
    }
    if qry_subs.get(&pos) == Some(&nuc) {
      shared += 1;
    } else {
      node_only += 1;
    }
  }

  let qry_only = qry_subs.len() - shared;
  node_only + qry_only
}

fn is_better(tree: &Tree, candidate: (usize, TreeNodeKey), best: (usize, TreeNodeKey)) -> bool {
  let (candidate_distance, candidate_key) = candidate;
  let (best_distance, best_key) = best;

  if candidate_distance != best_distance {
    return candidate_distance < best_distance;
  }

  let candidate_node = tree.get(candidate_key);
  let best_node = tree.get(best_key);
  if candidate_node.depth != best_node.depth {
    return candidate_node.depth > best_node.depth;
  }

  candidate_node.clade() < best_node.clade()
}
