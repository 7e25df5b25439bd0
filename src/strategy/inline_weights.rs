//! Weighted promotion over priority-typed columns.
//!
//! Each story repeatedly offers its best remaining weighted property (the
//! heavier column wins ties). The story whose offer has the higher priority
//! ranks first; equal priorities go to the offer from the heavier column.
//! On a full tie both offers are consumed and the next round starts.

use std::cmp::Ordering;

use log::debug;

use crate::{error::RankError, priority::Priority, story::Story};

fn best_offer(story: &Story, remaining: &[&str]) -> (Priority, usize) {
    let mut best = (Priority::NotAvailable, 0);
    for (position, name) in remaining.iter().enumerate() {
        let value = story
            .get(name)
            .and_then(|value| value.as_priority())
            .unwrap_or_default();
        if value > best.0 {
            best = (value, position);
        }
    }
    best
}

fn weighted_order(rules: &[(String, i64)], a: &Story, b: &Story) -> Ordering {
    let mut left: Vec<&str> = rules.iter().map(|(name, _)| name.as_str()).collect();
    let mut right = left.clone();

    while !left.is_empty() {
        let (left_value, left_position) = best_offer(a, &left);
        let (right_value, right_position) = best_offer(b, &right);
        let ordering = left_value
            .cmp(&right_value)
            .then_with(|| right_position.cmp(&left_position));
        if ordering != Ordering::Equal {
            return ordering;
        }
        left.remove(left_position);
        right.remove(right_position);
    }
    Ordering::Equal
}

/// `Greater` means `a` should rank ahead of `b`.
pub fn compare_inline_weights(a: &Story, b: &Story) -> Result<Ordering, RankError> {
    if !a.same_factory(b) {
        return Err(RankError::FactoryMismatch);
    }
    Ok(weighted_order(a.factory().weight_rules(), a, b))
}

pub fn sort_by_inline_weights(mut stories: Vec<Story>) -> Result<Vec<Story>, RankError> {
    let Some(first) = stories.first() else {
        return Ok(stories);
    };
    if !stories.iter().all(|story| story.same_factory(first)) {
        return Err(RankError::FactoryMismatch);
    }
    let factory = first.factory().clone();
    let rules = factory.weight_rules();
    debug!("Weighted promotion over {} rule(s)", rules.len());
    if rules.is_empty() {
        return Ok(stories);
    }
    stories.sort_by(|a, b| weighted_order(rules, b, a));
    Ok(stories)
}
