//! Ranking pipeline.
//!
//! Enabled strategies run in ascending priority order, each one consuming the
//! previous output. Stories flagged as not needing ranking bypass every
//! strategy and are appended afterwards in their input order.

pub mod inline_weights;
pub mod raise_ranking;
pub mod scope;
pub mod sort_order;

use log::{debug, info, warn};

use crate::{
    definition::{Definition, INLINE_WEIGHTS, RAISE_RANKING, SORT_ORDER},
    error::RankError,
    story::Story,
};

pub use inline_weights::{compare_inline_weights, sort_by_inline_weights};
pub use raise_ranking::sort_by_raise_ranking;
pub use scope::{parent_runs, parent_scope};
pub use sort_order::sort_by_property_and_order;

/// Splits stories into `(needs ranking, excluded)`, keeping relative order.
pub fn split_for_ranking(stories: Vec<Story>) -> (Vec<Story>, Vec<Story>) {
    stories.into_iter().partition(Story::needs_ranking)
}

pub fn rank(definition: &Definition, stories: Vec<Story>) -> Result<Vec<Story>, RankError> {
    let (mut ranked, excluded) = split_for_ranking(stories);
    info!(
        "Ranking {} story(ies); {} excluded",
        ranked.len(),
        excluded.len()
    );
    let columns = definition.columns();

    for strategy in definition.sort_strategies() {
        debug!(
            "Applying strategy '{}' (priority {})",
            strategy.name, strategy.priority
        );
        ranked = if strategy.is_named(INLINE_WEIGHTS) {
            sort_by_inline_weights(ranked)?
        } else if strategy.is_named(SORT_ORDER) {
            sort_by_property_and_order(ranked, &columns, &strategy)?
        } else if strategy.is_named(RAISE_RANKING) {
            sort_by_raise_ranking(ranked, &columns, &strategy)?
        } else {
            warn!("Skipping unknown sort strategy '{}'", strategy.name);
            ranked
        };
    }

    ranked.extend(excluded);
    Ok(ranked)
}
