use crate::io::nuc::Nuc;
use crate::io::parse_mutation::{parse_aa_mutation_without_gene, parse_nuc_mutation};
use crate::make_error;
use crate::tree::tree::{AuspiceTree, AuspiceTreeNode, Tree, TreeNode, TreeNodeKey};
use eyre::{Report, WrapErr};
use std::collections::BTreeMap;

/// Converts the nested wire format into the working arena, accumulating per-branch
/// mutations into root-to-node substitution sets along the way.
///
/// A branch mutation that restores the reference letter at its position cancels the
/// corresponding inherited substitution instead of adding a new one.
pub fn tree_preprocess(auspice: AuspiceTree, ref_seq: &[Nuc]) -> Result<Tree, Report> {
  let mut tree = Tree {
    nodes: vec![],
    meta: auspice.meta,
    other: auspice.other,
  };

  // Depth-first, with an explicit stack of (unprocessed node, parent key)
  let mut stack: Vec<(AuspiceTreeNode, Option<TreeNodeKey>)> = vec![(auspice.tree, None)];
  while let Some((mut node, parent_key)) = stack.pop() {
    let children = std::mem::take(&mut node.children);

    let (substitutions, n_own_muts) = process_node_mutations(&node, parent_key.map(|key| &tree.nodes[key]), ref_seq)
      .wrap_err_with(|| format!("When preprocessing reference tree node \"{}\"", node.name))?;

    let key = tree.nodes.len();
    let depth = parent_key.map_or(0, |parent| tree.nodes[parent].depth + 1);
    tree.nodes.push(TreeNode {
      key,
      payload: node,
      children: vec![],
      depth,
      substitutions,
      n_own_muts,
      max_muts_below: 0,
    });
    if let Some(parent_key) = parent_key {
      tree.nodes[parent_key].children.push(key);
    }

    for child in children.into_iter().rev() {
      stack.push((child, Some(key)));
    }
  }

  // Children always receive larger keys than their parents, so one reverse sweep
  // computes the subtree mutation bounds bottom-up
  for key in (0..tree.nodes.len()).rev() {
    let max_muts_below = tree.nodes[key]
      .children
      .iter()
      .map(|&child| {
        let child = &tree.nodes[child];
        child.n_own_muts + child.max_muts_below
      })
      .max()
      .unwrap_or(0);
    tree.nodes[key].max_muts_below = max_muts_below;
  }

  Ok(tree)
}

fn process_node_mutations(
  node: &AuspiceTreeNode,
  parent: Option<&TreeNode>,
  ref_seq: &[Nuc],
) -> Result<(BTreeMap<usize, Nuc>, usize), Report> {
  let mut substitutions = parent.map_or_else(BTreeMap::new, |parent| parent.substitutions.clone());
  let mut n_own_muts = 0;

  for (key, mutations) in &node.branch_attrs.mutations {
    if key == "nuc" {
      for mutation_str in mutations {
        let mutation = parse_nuc_mutation(mutation_str)
          .wrap_err_with(|| format!("When parsing reference tree mutation \"{mutation_str}\""))?;
        if mutation.pos >= ref_seq.len() {
          return make_error!(
            "Reference tree mutation \"{mutation_str}\" is out of bounds of the reference of length {}",
            ref_seq.len()
          );
        }
        if mutation.qry == ref_seq[mutation.pos] {
          // Reversion to the reference letter
          substitutions.remove(&mutation.pos);
        } else {
          substitutions.insert(mutation.pos, mutation.qry);
        }
        n_own_muts += 1;
      }
    } else {
      // Aminoacid mutations are carried per gene. They do not participate in the
      // placement, but malformed ones still make the tree invalid.
      for mutation_str in mutations {
        parse_aa_mutation_without_gene(mutation_str)
          .wrap_err_with(|| format!("When parsing reference tree mutation \"{mutation_str}\" of gene \"{key}\""))?;
      }
    }
  }

  Ok((substitutions, n_own_muts))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::json::json_parse;
  use crate::io::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn example_tree_json() -> String {
    r#"{
      "meta": { "title": "test tree" },
      "tree": {
        "name": "root",
        "branch_attrs": { "mutations": {} },
        "node_attrs": { "clade_membership": { "value": "19A" } },
        "children": [
          {
            "name": "child-1",
            "branch_attrs": { "mutations": { "nuc": ["A123T"] } },
            "node_attrs": { "clade_membership": { "value": "19B" } }
          },
          {
            "name": "child-2",
            "branch_attrs": { "mutations": { "nuc": ["A123T", "G456C"] } },
            "node_attrs": { "clade_membership": { "value": "20A" } }
          }
        ]
      }
    }"#
    .to_owned()
  }

  #[rstest]
  fn preprocesses_example_tree() -> Result<(), Report> {
    let auspice: AuspiceTree = json_parse(&example_tree_json())?;
    let ref_seq = to_nuc_seq(&"A".repeat(500))?;
    let tree = tree_preprocess(auspice, &ref_seq)?;

    assert_eq!(tree.nodes.len(), 3);

    let root = tree.root();
    assert_eq!(root.substitutions.len(), 0);
    assert_eq!(root.depth, 0);
    assert_eq!(root.max_muts_below, 2);

    let child_1 = tree.get(root.children[0]);
    assert_eq!(child_1.payload.name, "child-1");
    assert_eq!(child_1.substitutions, BTreeMap::from([(122, Nuc::T)]));
    assert_eq!(child_1.depth, 1);

    let child_2 = tree.get(root.children[1]);
    assert_eq!(child_2.payload.name, "child-2");
    assert_eq!(child_2.substitutions, BTreeMap::from([(122, Nuc::T), (455, Nuc::C)]));
    Ok(())
  }

  #[rstest]
  fn cancels_reversions() -> Result<(), Report> {
    let tree_json = r#"{
      "tree": {
        "name": "root",
        "branch_attrs": { "mutations": { "nuc": ["A10T"] } },
        "children": [
          { "name": "child", "branch_attrs": { "mutations": { "nuc": ["T10A"] } } }
        ]
      }
    }"#;
    let auspice: AuspiceTree = json_parse(tree_json)?;
    let ref_seq = to_nuc_seq(&"A".repeat(20))?;
    let tree = tree_preprocess(auspice, &ref_seq)?;

    assert_eq!(tree.root().substitutions, BTreeMap::from([(9, Nuc::T)]));
    assert_eq!(tree.get(1).substitutions, BTreeMap::new());
    Ok(())
  }

  #[rstest]
  fn rejects_malformed_mutations() -> Result<(), Report> {
    let tree_json = r#"{
      "tree": {
        "name": "root",
        "branch_attrs": { "mutations": { "nuc": ["garbage"] } }
      }
    }"#;
    let auspice: AuspiceTree = json_parse(tree_json)?;
    let ref_seq = to_nuc_seq(&"A".repeat(20))?;
    assert!(tree_preprocess(auspice, &ref_seq).is_err());
    Ok(())
  }

  #[rstest]
  fn rejects_out_of_bounds_mutations() -> Result<(), Report> {
    let tree_json = r#"{
      "tree": {
        "name": "root",
        "branch_attrs": { "mutations": { "nuc": ["A100T"] } }
      }
    }"#;
    let auspice: AuspiceTree = json_parse(tree_json)?;
    let ref_seq = to_nuc_seq(&"A".repeat(20))?;
    assert!(tree_preprocess(auspice, &ref_seq).is_err());
    Ok(())
  }
}
