use crate::corpus::Corpus;
use algograph::graph::VertexId;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
    hash::Hash,
};

pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_SAMPLES: usize = 10_000;
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Per-vertex scores of one estimator run.
pub type Scores = HashMap<VertexId, f64, ahash::RandomState>;

/// Per-page ranks, keyed and ordered by page name.
pub type RankVector = BTreeMap<String, f64>;

pub fn norm_1<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().map(|x| x.abs()).sum()
}

pub fn norm_inf<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().fold(0.0, |acc, x| acc.max(x.abs()))
}

pub fn by_name(corpus: &Corpus, scores: &Scores) -> RankVector {
    corpus
        .iter_vertices()
        .filter_map(|v| {
            let page = corpus.name(&v)?;
            Some((page.to_string(), scores.get(&v).copied().unwrap_or(0.0)))
        })
        .collect()
}

/// Renders `ranks` the way the `pagerank` binary prints them.
pub fn format_ranks(title: &str, ranks: &RankVector) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    for (page, rank) in ranks.iter() {
        let _ = writeln!(out, "  {page}: {rank:.4}");
    }
    out
}
