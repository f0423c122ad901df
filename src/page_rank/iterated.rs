use super::*;
use crate::{
    common::*,
    corpus::Corpus,
    error::{check_damping, Error},
};
use algograph::graph::VertexId;
use std::collections::HashMap;

/// Power iteration of `R = (1 - d)/N + d * M R`.
///
/// `M` is the column-stochastic link matrix, with the column of a dangling
/// page spread uniformly over all pages. Every round recomputes all ranks
/// from the previous round only.
pub struct IteratedPageRank<'a> {
    corpus: &'a Corpus,
    damping: f64,
    epsilon: f64,
    max_iterations: usize,
    vertices: Vec<VertexId>,
    // for each page, positions of the pages linking to it
    inbound: Vec<Vec<usize>>,
    out_degrees: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    /// A round converges when no page moved by more than this.
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            epsilon: DEFAULT_EPSILON,
            max_iterations: 100_000,
        }
    }
}

impl Config {
    pub fn validate(&self) -> crate::Result<()> {
        check_damping(self.damping)?;
        let epsilon = self.epsilon;
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(Error::InvalidParameter(format!("epsilon={epsilon}")));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter("max_iterations=0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub page_rank: Scores,
    /// Change of each page in the final round.
    pub delta: Scores,
    pub iterations: usize,
}

impl<'a> IteratedPageRank<'a> {
    pub fn new(corpus: &'a Corpus, config: &Config) -> crate::Result<Self> {
        config.validate()?;
        let vertices: Vec<_> = corpus.iter_vertices().collect();
        let n = vertices.len();
        let positions: HashMap<_, _, ahash::RandomState> =
            vertices.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let mut inbound = vec![vec![]; n];
        let mut out_degrees = vec![0.0; n];
        for (i, u) in vertices.iter().enumerate() {
            if corpus.is_dangling(u) {
                out_degrees[i] = n as f64;
                for sources in inbound.iter_mut() {
                    sources.push(i);
                }
            } else {
                for v in corpus.successors(u) {
                    if let Some(j) = positions.get(&v) {
                        inbound[*j].push(i);
                        out_degrees[i] += 1.0;
                    }
                }
            }
        }
        Ok(Self {
            corpus,
            damping: config.damping,
            epsilon: config.epsilon,
            max_iterations: config.max_iterations,
            vertices,
            inbound,
            out_degrees,
        })
    }

    fn to_scores(&self, xs: &[f64]) -> Scores {
        self.vertices.iter().copied().zip(xs.iter().copied()).collect()
    }
}

impl PageRank for IteratedPageRank<'_> {
    type Result = self::Result;

    fn calc(&self) -> crate::Result<Self::Result> {
        let damping = self.damping;
        let n = self.vertices.len() as f64;
        let jump = (1.0 - damping) / n;
        let mut p = vec![1.0 / n; self.vertices.len()];
        let mut r = vec![0.0; self.vertices.len()];
        for iterations in 1..=self.max_iterations {
            for (to, sources) in r.iter_mut().zip(self.inbound.iter()) {
                *to = jump;
                for q in sources.iter() {
                    *to += damping * p[*q] / self.out_degrees[*q];
                }
            }
            let converged = p
                .iter()
                .zip(r.iter())
                .all(|(a, b)| (a - b).abs() <= self.epsilon);
            if converged {
                let delta: Vec<_> = r.iter().zip(p.iter()).map(|(a, b)| a - b).collect();
                tracing::debug!(
                    iterations,
                    pages = self.corpus.len(),
                    "iteration converged"
                );
                return Ok(Self::Result {
                    page_rank: self.to_scores(&r),
                    delta: self.to_scores(&delta),
                    iterations,
                });
            }
            std::mem::swap(&mut p, &mut r);
        }
        tracing::warn!(iterations = self.max_iterations, "iteration did not converge");
        Err(Error::NotConverged {
            iterations: self.max_iterations,
        })
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
            let d = self.result.delta.get(&v).copied().unwrap_or_default();
            writeln!(f, "{page}: {p:?}, {d:?}")?;
        }
        Ok(())
    }
}

/// Iterates until no page moves by more than [`DEFAULT_EPSILON`].
pub fn iterate_rank(corpus: &Corpus, damping: f64) -> crate::Result<RankVector> {
    let config = Config {
        damping,
        ..Default::default()
    };
    let pr = IteratedPageRank::new(corpus, &config)?;
    Ok(pr.calc()?.ranks(corpus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{corpus::fixture, page_rank::tests::RandomCorpus};
    use quickcheck_macros::quickcheck;
    use rand::{rngs::SmallRng, SeedableRng};

    fn total(ranks: &RankVector) -> f64 {
        ranks.values().sum()
    }

    fn calc(c: &Corpus, config: &Config) -> self::Result {
        IteratedPageRank::new(c, config).unwrap().calc().unwrap()
    }

    #[test]
    fn single_page() {
        let c = fixture(&[("A", &[])]);
        let ranks = iterate_rank(&c, 0.85).unwrap();
        assert!((ranks["A"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cycle_is_uniform() {
        let c = fixture(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        let ranks = iterate_rank(&c, 0.85).unwrap();
        for r in ranks.values() {
            assert!((r - 1.0 / 3.0).abs() < 1e-3, "{ranks:?}");
        }
    }

    #[test]
    fn complete_graph_is_uniform() {
        const N: usize = 6;
        let pages: Vec<_> = (0..N).map(|i| i.to_string()).collect();
        let c = Corpus::new(pages.iter().map(|p| (p.clone(), pages.clone()))).unwrap();
        let ranks = iterate_rank(&c, 0.85).unwrap();
        for r in ranks.values() {
            assert!((r - 1.0 / N as f64).abs() < 1e-3, "{ranks:?}");
        }
    }

    #[test]
    fn dangling_fixed_point() {
        // B spreads its rank over A, B and C:
        //   A = j + d (C + B/3)
        //   B = j + d (A + B/3)
        //   C = j + d B/3
        let corpus = fixture(&[("A", &["B"]), ("B", &[]), ("C", &["A"])]);
        let ranks = iterate_rank(&corpus, 0.85).unwrap();
        assert!((total(&ranks) - 1.0).abs() < 1e-6);
        let (d, j) = (0.85, 0.05);
        let b = j * (1.0 + d + d * d) / (1.0 - d / 3.0 - d * d * (1.0 + d) / 3.0);
        let c = j + d * b / 3.0;
        let a = j + d * (c + b / 3.0);
        let expected = [("A", a), ("B", b), ("C", c)];
        for (page, rank) in expected {
            assert!(
                (ranks[page] - rank).abs() < DEFAULT_EPSILON,
                "{page}: {} vs {rank}",
                ranks[page]
            );
        }
        assert!(ranks["B"] > ranks["A"] && ranks["A"] > ranks["C"]);
    }

    #[test]
    fn sums_to_one() {
        let c = fixture(&[
            ("1", &["2"]),
            ("2", &["1", "3"]),
            ("3", &["2", "4", "5"]),
            ("4", &["1", "2"]),
            ("5", &[]),
        ]);
        let res = calc(&c, &Config::default());
        assert!((norm_1(&res.page_rank) - 1.0).abs() < 1e-6);
        assert!(norm_inf(&res.delta) <= DEFAULT_EPSILON);
        let ranks = res.ranks(&c);
        assert!((ranks["2"] - 0.3532).abs() < 2e-3, "{ranks:?}");
        assert!((ranks["4"] - ranks["5"]).abs() < 1e-12, "{ranks:?}");
    }

    #[test]
    fn unlinked_page_gets_only_jumps() {
        let c = fixture(&[
            ("A", &["B", "C"]),
            ("B", &["A", "C"]),
            ("C", &["A", "B"]),
            ("D", &["A", "B", "C"]),
        ]);
        let ranks = iterate_rank(&c, 0.85).unwrap();
        assert!((ranks["D"] - 0.0375).abs() < 1e-9, "{ranks:?}");
    }

    #[test]
    fn deterministic() {
        let c = fixture(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &["A"]), ("D", &[])]);
        let a = iterate_rank(&c, 0.85).unwrap();
        for _ in 0..10 {
            assert_eq!(iterate_rank(&c, 0.85).unwrap(), a);
        }
    }

    #[test]
    fn terminates_quickly() {
        let fixtures = [
            fixture(&[("A", &[])]),
            fixture(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]),
            fixture(&[("A", &["B"]), ("B", &[]), ("C", &["A"])]),
            fixture(&[("A", &["B"]), ("B", &["A"]), ("C", &["A"])]),
        ];
        for c in fixtures.iter() {
            let res = calc(c, &Config::default());
            assert!(res.iterations <= 100, "{c:?}: {}", res.iterations);
        }
    }

    #[test]
    fn tighter_epsilon_takes_longer() {
        let c = fixture(&[("A", &["B"]), ("B", &[]), ("C", &["A"])]);
        let loose = calc(&c, &Config::default());
        let tight = calc(
            &c,
            &Config {
                epsilon: 1e-12,
                ..Default::default()
            },
        );
        assert!(tight.iterations > loose.iterations);
        assert!((tight.page_rank.values().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn periodic_without_damping() {
        let c = fixture(&[("A", &["B"]), ("B", &["A"]), ("C", &["A"])]);
        let cfg = Config {
            damping: 1.0,
            max_iterations: 50,
            ..Default::default()
        };
        let err = IteratedPageRank::new(&c, &cfg).unwrap().calc().unwrap_err();
        assert!(matches!(err, Error::NotConverged { iterations: 50 }), "{err}");
    }

    #[test]
    fn rejects_bad_config() {
        let c = fixture(&[("A", &[])]);
        for cfg in [
            Config {
                damping: -0.5,
                ..Default::default()
            },
            Config {
                epsilon: 0.0,
                ..Default::default()
            },
            Config {
                epsilon: f64::INFINITY,
                ..Default::default()
            },
            Config {
                max_iterations: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                IteratedPageRank::new(&c, &cfg),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[quickcheck]
    fn random_corpus(c: RandomCorpus) {
        let c = &c.corpus;
        let res = calc(c, &Config::default());
        assert!((norm_1(&res.page_rank) - 1.0).abs() < 1e-6, "{:?}", res.debug(c));
        assert!(res.iterations <= 200, "{}", res.iterations);
    }

    #[quickcheck]
    fn agrees_with_sampling(c: RandomCorpus, seed: u64) {
        let c = &c.corpus;
        let by_iteration = iterate_rank(c, 0.85).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let by_sampling = sample_rank(c, 0.85, 20_000, &mut rng).unwrap();
        for (page, r) in by_iteration.iter() {
            assert!(
                (r - by_sampling[page]).abs() < 0.05,
                "{page}: {by_iteration:?} vs {by_sampling:?}"
            );
        }
    }
}
