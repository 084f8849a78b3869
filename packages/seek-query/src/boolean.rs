use crate::{Condition, Error, Result};

pub const DEFAULT_BOOST: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occur {
	/// Every child must match; scores add up.
	Must,
	/// At least one child must match; every matching child adds to the score.
	Should,
	/// No child may match; never scores.
	MustNot,
}
impl Occur {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Must => "must",
			Self::Should => "should",
			Self::MustNot => "must_not",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
	Condition(Condition),
	Bool(BoolQuery),
}
impl QueryNode {
	pub fn as_bool(&self) -> Option<&BoolQuery> {
		match self {
			Self::Bool(node) => Some(node),
			Self::Condition(_) => None,
		}
	}

	pub fn as_condition(&self) -> Option<&Condition> {
		match self {
			Self::Condition(condition) => Some(condition),
			Self::Bool(_) => None,
		}
	}
}

impl From<Condition> for QueryNode {
	fn from(condition: Condition) -> Self {
		Self::Condition(condition)
	}
}

impl From<BoolQuery> for QueryNode {
	fn from(node: BoolQuery) -> Self {
		Self::Bool(node)
	}
}

/// A boolean combination of conditions and nested combinations.
///
/// Boosts multiply along the path from the root to a leaf, so a subtree boosted by 10 inside a
/// branch boosted by 100 contributes with weight 1000. `Clone` yields a deep copy: the copy can be
/// re-boosted without touching the original, which is how one subtree is reused at two tiers.
#[derive(Clone, Debug, PartialEq)]
pub struct BoolQuery {
	occur: Occur,
	children: Vec<QueryNode>,
	boost: f32,
}
impl BoolQuery {
	pub fn new<I, N>(occur: Occur, children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<QueryNode>,
	{
		Self { occur, children: children.into_iter().map(Into::into).collect(), boost: DEFAULT_BOOST }
	}

	pub fn must<I, N>(children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<QueryNode>,
	{
		Self::new(Occur::Must, children)
	}

	pub fn should<I, N>(children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<QueryNode>,
	{
		Self::new(Occur::Should, children)
	}

	pub fn must_not<I, N>(children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<QueryNode>,
	{
		Self::new(Occur::MustNot, children)
	}

	pub fn with_boost(mut self, boost: f32) -> Result<Self> {
		self.set_boost(boost)?;

		Ok(self)
	}

	pub fn set_boost(&mut self, boost: f32) -> Result<()> {
		if !boost.is_finite() || boost <= 0.0 {
			return Err(Error::InvalidBoost { boost });
		}

		self.boost = boost;

		Ok(())
	}

	pub fn push(&mut self, child: impl Into<QueryNode>) {
		self.children.push(child.into());
	}

	/// Appends `child` unless it has no children of its own. An empty branch carries no
	/// constraint and is never submitted.
	pub fn push_branch(&mut self, child: BoolQuery) {
		if !child.is_empty() {
			self.children.push(QueryNode::Bool(child));
		}
	}

	pub fn occur(&self) -> Occur {
		self.occur
	}

	pub fn children(&self) -> &[QueryNode] {
		&self.children
	}

	pub fn boost(&self) -> f32 {
		self.boost
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	pub fn len(&self) -> usize {
		self.children.len()
	}

	/// Every condition in the subtree, depth first.
	pub fn conditions(&self) -> Vec<&Condition> {
		let mut out = Vec::new();

		collect_conditions(self, &mut out);

		out
	}
}

/// The unit submitted for execution.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
	root: BoolQuery,
}
impl Query {
	pub fn new(root: BoolQuery) -> Self {
		Self { root }
	}

	pub fn root(&self) -> &BoolQuery {
		&self.root
	}
}

fn collect_conditions<'a>(node: &'a BoolQuery, out: &mut Vec<&'a Condition>) {
	for child in &node.children {
		match child {
			QueryNode::Condition(condition) => out.push(condition),
			QueryNode::Bool(inner) => collect_conditions(inner, out),
		}
	}
}
