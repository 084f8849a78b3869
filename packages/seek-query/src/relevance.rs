//! Exact-or-fuzzy matching reused at two boost tiers.
//!
//! Every free-text field is searched with the same pair: a `match` that rewards the analysed
//! keywords and a `fuzzy` that tolerates typos. The pair is placed twice in the final tree, once
//! inside a boosted `must` (the strict tier) and once as a lower-boosted copy (the loose tier), so
//! a strong hit on one field outranks weak hits spread across several fields.

use crate::{BoolQuery, Condition, Fuzziness, QueryNode, Result};

pub const FUZZY_EDIT_DISTANCE: u32 = 3;
pub const FUZZY_PREFIX_LENGTH: u32 = 2;
pub const FUZZY_MAX_EXPANSIONS: u32 = 100;

/// Boosts applied to the strict and loose copies of a tiered field match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tier {
	pub strict: f32,
	pub loose: f32,
}
impl Tier {
	pub const fn new(strict: f32, loose: f32) -> Self {
		Self { strict, loose }
	}
}

/// `should[match(field, keywords), fuzzy(field, keywords)]`, for any keywords including the
/// empty string.
pub fn exact_or_fuzzy(field: &str, keywords: &str) -> Result<BoolQuery> {
	let exact = Condition::match_text(field, keywords)?;
	let fuzzy = Condition::fuzzy(
		field,
		keywords,
		Fuzziness::Edits(FUZZY_EDIT_DISTANCE),
		FUZZY_PREFIX_LENGTH,
		FUZZY_MAX_EXPANSIONS,
	)?;

	Ok(BoolQuery::should([exact, fuzzy]))
}

/// Returns `[strict, loose]`: `must[pair]` boosted by `tier.strict` and an independent copy of
/// the pair boosted by `tier.loose`.
pub fn tiered(field: &str, keywords: &str, tier: Tier) -> Result<[BoolQuery; 2]> {
	tiered_with(field, keywords, Vec::new(), tier)
}

/// Like [`tiered`], with `gates` required next to the pair in the strict tier only.
pub fn tiered_with(
	field: &str,
	keywords: &str,
	gates: Vec<QueryNode>,
	tier: Tier,
) -> Result<[BoolQuery; 2]> {
	let pair = exact_or_fuzzy(field, keywords)?;
	let loose = pair.clone().with_boost(tier.loose)?;
	let mut strict_children = gates;

	strict_children.push(QueryNode::Bool(pair));

	let strict = BoolQuery::must(strict_children).with_boost(tier.strict)?;

	Ok([strict, loose])
}

#[cfg(test)]
mod tests {
	use super::{Tier, exact_or_fuzzy, tiered, tiered_with};
	use crate::{Condition, Fuzziness, Occur, QueryNode};

	#[test]
	fn pair_has_exact_then_fuzzy() {
		for text in ["acme", "", "  ", "a,b*?"] {
			let pair = exact_or_fuzzy("name", text).expect("valid pair");

			assert_eq!(pair.occur(), Occur::Should);
			assert_eq!(pair.len(), 2);
			assert!(matches!(
				pair.children()[0].as_condition(),
				Some(Condition::Match { field, text: t }) if field == "name" && t == text
			));
			assert!(matches!(
				pair.children()[1].as_condition(),
				Some(Condition::Fuzzy {
					fuzziness: Fuzziness::Edits(3),
					prefix_length: 2,
					max_expansions: 100,
					..
				})
			));
		}
	}

	#[test]
	fn tiers_do_not_share_boosts() {
		let [strict, loose] = tiered("work_name", "sales", Tier::new(10.0, 1.0)).expect("tiers");

		assert_eq!(strict.occur(), Occur::Must);
		assert_eq!(strict.boost(), 10.0);
		assert_eq!(loose.occur(), Occur::Should);
		assert_eq!(loose.boost(), 1.0);

		let inner = strict.children()[0].as_bool().expect("nested pair");

		assert_eq!(inner.boost(), 1.0);
		assert_eq!(inner.children(), loose.children());
	}

	#[test]
	fn gates_only_apply_to_strict_tier() {
		let gate = QueryNode::from(Condition::ids(["company_7"], Some("company")).expect("ids"));
		let [strict, loose] =
			tiered_with("name", "acme", vec![gate], Tier::new(1000.0, 100.0)).expect("tiers");

		assert_eq!(strict.len(), 2);
		assert!(matches!(strict.children()[0].as_condition(), Some(Condition::Ids { .. })));
		assert_eq!(loose.len(), 2);
		assert!(loose.conditions().iter().all(|c| c.field() == Some("name")));
	}
}
