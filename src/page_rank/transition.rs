//! Random-surfer transition model.
//!
//! From page `u`, the surfer follows one of `u`'s links with probability
//! `damping` and jumps to a uniformly random page otherwise. A dangling page
//! links to every page, itself included.

use crate::{
    common::Scores,
    corpus::Corpus,
    error::{check_damping, Error, Result},
};
use algograph::graph::VertexId;
use std::collections::BTreeMap;

/// Probability of each page being visited next.
pub type Distribution = Scores;

pub fn transition(corpus: &Corpus, page: &VertexId, damping: f64) -> Result<Distribution> {
    check_damping(damping)?;
    if corpus.name(page).is_none() {
        return Err(Error::InvalidParameter(format!("unknown page {page:?}")));
    }
    let n = corpus.len() as f64;
    let jump = (1.0 - damping) / n;
    let mut dist: Distribution = corpus.iter_vertices().map(|v| (v, jump)).collect();

    let links: Vec<_> = if corpus.is_dangling(page) {
        corpus.iter_vertices().collect()
    } else {
        corpus.successors(page).collect()
    };
    let follow = damping / (links.len() as f64);
    for v in links.iter() {
        if let Some(w) = dist.get_mut(v) {
            *w += follow;
        }
    }
    Ok(dist)
}

/// [`transition`] keyed by page names.
pub fn transition_by_name(
    corpus: &Corpus,
    page: &str,
    damping: f64,
) -> Result<BTreeMap<String, f64>> {
    let u = corpus
        .vertex(page)
        .ok_or_else(|| Error::InvalidParameter(format!("unknown page {page}")))?;
    let dist = transition(corpus, &u, damping)?;
    Ok(crate::common::by_name(corpus, &dist))
}
