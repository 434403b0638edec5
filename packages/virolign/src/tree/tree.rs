use crate::io::nuc::Nuc;
use eyre::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn empty_object() -> Value {
  Value::Object(serde_json::Map::new())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeNodeAttr {
  pub value: String,
  #[serde(flatten)]
  pub other: Value,
}

impl TreeNodeAttr {
  pub fn new(value: &str) -> Self {
    Self {
      value: value.to_owned(),
      other: empty_object(),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeBranchAttrs {
  #[serde(default)]
  pub mutations: BTreeMap<String, Vec<String>>,
  #[serde(flatten)]
  pub other: Value,
}

impl Default for TreeBranchAttrs {
  fn default() -> Self {
    Self {
      mutations: BTreeMap::new(),
      other: empty_object(),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeNodeAttrs {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub clade_membership: Option<TreeNodeAttr>,
  #[serde(flatten)]
  pub other: Value,
}

impl Default for TreeNodeAttrs {
  fn default() -> Self {
    Self {
      clade_membership: None,
      other: empty_object(),
    }
  }
}

/// One node of the reference tree, in the nested wire format
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuspiceTreeNode {
  pub name: String,
  #[serde(default)]
  pub branch_attrs: TreeBranchAttrs,
  #[serde(default)]
  pub node_attrs: TreeNodeAttrs,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<AuspiceTreeNode>,
  #[serde(flatten)]
  pub other: Value,
}

/// Reference tree document, in the nested wire format
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuspiceTree {
  #[serde(default)]
  pub meta: Value,
  pub tree: AuspiceTreeNode,
  #[serde(flatten)]
  pub other: Value,
}

pub type TreeNodeKey = usize;

/// One vertex of the working tree.
///
/// `substitutions` is the precomputed set of nucleotide substitutions on the path from the
/// root to this node, as a map from position to the letter the node carries there.
#[derive(Clone, Debug)]
pub struct TreeNode {
  pub key: TreeNodeKey,
  pub payload: AuspiceTreeNode,
  pub children: Vec<TreeNodeKey>,
  pub depth: usize,
  pub substitutions: BTreeMap<usize, Nuc>,
  /// Number of branch mutations leading into this node
  pub n_own_muts: usize,
  /// Upper bound on the total number of branch mutations on any path descending from this node.
  /// Used to prune subtrees which cannot beat the best placement found so far.
  pub max_muts_below: usize,
}

impl TreeNode {
  pub fn clade(&self) -> String {
    self
      .payload
      .node_attrs
      .clade_membership
      .as_ref()
      .map_or_else(String::new, |attr| attr.value.clone())
  }
}

/// The working tree: an arena of nodes indexed by integer keys, the root at key 0.
///
/// Loaded once, reshaped only by attaching new leaves after the analysis; no node is ever
/// deleted. Parent pointers are not stored; traversals reconstruct ancestry with an
/// explicit stack.
#[derive(Clone, Debug)]
pub struct Tree {
  pub nodes: Vec<TreeNode>,
  pub meta: Value,
  pub other: Value,
}

impl Tree {
  pub const ROOT_KEY: TreeNodeKey = 0;

  pub fn root(&self) -> &TreeNode {
    &self.nodes[Self::ROOT_KEY]
  }

  pub fn get(&self, key: TreeNodeKey) -> &TreeNode {
    &self.nodes[key]
  }

  /// Attaches a new leaf under the given parent and returns its key
  pub fn add_child(&mut self, parent_key: TreeNodeKey, payload: AuspiceTreeNode) -> TreeNodeKey {
    let key = self.nodes.len();
    let depth = self.nodes[parent_key].depth + 1;
    self.nodes.push(TreeNode {
      key,
      payload,
      children: vec![],
      depth,
      substitutions: BTreeMap::new(),
      n_own_muts: 0,
      max_muts_below: 0,
    });
    self.nodes[parent_key].children.push(key);
    key
  }

  /// Rebuilds the nested wire format, including any leaves attached since loading
  pub fn to_auspice(&self) -> Result<AuspiceTree, Report> {
    Ok(AuspiceTree {
      meta: self.meta.clone(),
      tree: self.build_auspice_node(Self::ROOT_KEY),
      other: self.other.clone(),
    })
  }

  fn build_auspice_node(&self, key: TreeNodeKey) -> AuspiceTreeNode {
    let node = &self.nodes[key];
    let mut payload = node.payload.clone();
    payload.children = node
      .children
      .iter()
      .map(|&child_key| self.build_auspice_node(child_key))
      .collect();
    payload
  }
}
