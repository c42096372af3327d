//! Two-pass deduplication of a researcher's works.
//!
//! Identifier pass first: works sharing a normalized DOI fold into the
//! first listing. Title pass second, over the identifier-less remainder:
//! near-identical titles fold when their years agree or either year is
//! unknown. A chain only needs each member to match the anchor, not each
//! other.

use std::collections::HashMap;

use crate::merge::fold_missing;
use crate::models::Work;
use crate::similarity::token_sort_ratio;

/// Minimum token-sort similarity for two identifier-less works to be
/// considered the same publication.
pub const TITLE_MATCH_THRESHOLD: u32 = 90;

/// Collapse duplicate listings into survivors. Output order is not
/// significant.
pub fn dedupe_works(works: Vec<Work>) -> Vec<Work> {
    let mut keyed: Vec<Work> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unkeyed: Vec<Work> = Vec::new();

    for work in works {
        match work.doi.clone() {
            Some(doi) => match index.get(&doi) {
                Some(&at) => fold_missing(&mut keyed[at], &work),
                None => {
                    index.insert(doi, keyed.len());
                    keyed.push(work);
                }
            },
            None => unkeyed.push(work),
        }
    }

    let mut consumed = vec![false; unkeyed.len()];
    for i in 0..unkeyed.len() {
        if consumed[i] {
            continue;
        }
        for j in (i + 1)..unkeyed.len() {
            if consumed[j] || !same_publication(&unkeyed[i], &unkeyed[j]) {
                continue;
            }
            let (head, tail) = unkeyed.split_at_mut(j);
            fold_missing(&mut head[i], &tail[0]);
            consumed[j] = true;
        }
    }

    keyed.extend(
        unkeyed
            .into_iter()
            .zip(consumed)
            .filter_map(|(work, used)| (!used).then_some(work)),
    );
    keyed
}

fn same_publication(a: &Work, b: &Work) -> bool {
    let score = token_sort_ratio(
        a.title.as_deref().unwrap_or(""),
        b.title.as_deref().unwrap_or(""),
    );
    if score < TITLE_MATCH_THRESHOLD {
        return false;
    }
    match (a.year, b.year) {
        (Some(left), Some(right)) => left == right,
        _ => true,
    }
}
