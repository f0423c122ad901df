mod traits;
pub use self::traits::*;
pub mod iterated;
pub mod sampled;
pub mod transition;
pub use self::{
    iterated::{iterate_rank, IteratedPageRank},
    sampled::{sample_rank, SampledPageRank},
    transition::{transition, transition_by_name, Distribution},
};

use crate::{common::RankVector, corpus::Corpus, error::Result};
use rand::{rngs::StdRng, SeedableRng};

/// Runs both estimators on their own threads.
///
/// The sampling estimator gets a fresh [`StdRng`] seeded with `seed`, or
/// from the OS when `seed` is `None`.
pub fn rank_both(
    corpus: &Corpus,
    sampled: &sampled::Config,
    iterated: &iterated::Config,
    seed: Option<u64>,
) -> Result<(RankVector, RankVector)> {
    std::thread::scope(|s| {
        let by_sampling = s.spawn(|| {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let pr = SampledPageRank::new(corpus, sampled, rng)?;
            Ok::<_, crate::Error>(pr.calc()?.ranks(corpus))
        });
        let by_iteration = IteratedPageRank::new(corpus, iterated)
            .and_then(|pr| pr.calc())
            .map(|res| res.ranks(corpus));
        let by_sampling = match by_sampling.join() {
            Ok(res) => res,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        Ok((by_sampling?, by_iteration?))
    })
}
