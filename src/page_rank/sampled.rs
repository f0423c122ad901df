use super::*;
use crate::{
    common::*,
    corpus::Corpus,
    error::{check_damping, Error},
};
use algograph::graph::VertexId;
use rand::{
    distr::{weighted::WeightedIndex, Distribution as _},
    seq::IndexedRandom,
    Rng,
};
use std::{cell::RefCell, collections::HashMap};

/// Random-surfer estimation: a Markov chain of `samples` pages driven by
/// the transition model, where each page's rank is its share of visits.
pub struct SampledPageRank<'a, R>
where
    R: Rng,
{
    corpus: &'a Corpus,
    samples: usize,
    vertices: Vec<VertexId>,
    transitions: HashMap<VertexId, WeightedIndex<f64>, ahash::RandomState>,
    rng: RefCell<R>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Config {
    pub fn validate(&self) -> crate::Result<()> {
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(Error::InvalidParameter("samples=0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub page_rank: Scores,
    pub visits: HashMap<VertexId, usize, ahash::RandomState>,
}

impl<'a, R: Rng> SampledPageRank<'a, R> {
    pub fn new(corpus: &'a Corpus, config: &Config, rng: R) -> crate::Result<Self> {
        config.validate()?;
        let vertices: Vec<_> = corpus.iter_vertices().collect();
        let transitions = {
            let mut transitions = HashMap::with_hasher(ahash::RandomState::new());
            for u in vertices.iter() {
                let dist = transition(corpus, u, config.damping)?;
                let weights = vertices.iter().map(|v| dist.get(v).copied().unwrap_or(0.0));
                let index = WeightedIndex::new(weights)
                    .map_err(|e| Error::InvalidParameter(format!("transition of {u:?}: {e}")))?;
                transitions.insert(*u, index);
            }
            transitions
        };
        Ok(Self {
            corpus,
            samples: config.samples,
            vertices,
            transitions,
            rng: RefCell::new(rng),
        })
    }

    /// Gives the random source back, e.g. to continue a seeded sequence.
    pub fn into_rng(self) -> R {
        self.rng.into_inner()
    }
}

impl<R: Rng> PageRank for SampledPageRank<'_, R> {
    type Result = self::Result;

    fn calc(&self) -> crate::Result<Self::Result> {
        let mut rng = self.rng.borrow_mut();
        let mut visits: HashMap<_, _, ahash::RandomState> =
            self.vertices.iter().map(|v| (*v, 0usize)).collect();

        let mut cur = *self
            .vertices
            .choose(&mut *rng)
            .ok_or_else(|| Error::InvalidGraph("no pages".to_string()))?;
        *visits.entry(cur).or_insert(0) += 1;
        for _ in 1..self.samples {
            let next = self
                .transitions
                .get(&cur)
                .ok_or_else(|| Error::InvalidParameter(format!("unknown page {cur:?}")))?;
            cur = self.vertices[next.sample(&mut *rng)];
            *visits.entry(cur).or_insert(0) += 1;
        }

        let n = self.samples as f64;
        let page_rank: Scores = visits.iter().map(|(v, c)| (*v, *c as f64 / n)).collect();
        tracing::debug!(
            samples = self.samples,
            pages = self.corpus.len(),
            "random surfer finished"
        );
        Ok(Self::Result { page_rank, visits })
    }
}

impl PageRankResult for self::Result {
    fn page_rank(&self) -> &Scores {
        &self.page_rank
    }

    fn debug<'a>(&'a self, corpus: &'a Corpus) -> impl std::fmt::Debug + 'a {
        ResultDebug {
            corpus,
            result: self,
        }
    }
}

pub struct ResultDebug<'a> {
    corpus: &'a Corpus,
    result: &'a self::Result,
}

impl std::fmt::Debug for ResultDebug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in self.corpus.iter_vertices() {
            let page = self.corpus.name(&v).unwrap_or_default();
            let p = self.result.page_rank.get(&v).copied().unwrap_or_default();
            let c = self.result.visits.get(&v).copied().unwrap_or_default();
            writeln!(f, "{page}: {p:?}, {c}")?;
        }
        Ok(())
    }
}

/// Estimates ranks from `samples` steps of a random surfer.
pub fn sample_rank<R: Rng>(
    corpus: &Corpus,
    damping: f64,
    samples: usize,
    rng: &mut R,
) -> crate::Result<RankVector> {
    let config = Config { damping, samples };
    let pr = SampledPageRank::new(corpus, &config, rng)?;
    Ok(pr.calc()?.ranks(corpus))
}
