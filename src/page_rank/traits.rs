use crate::{common::*, corpus::Corpus, error::Result};

pub trait PageRank {
    type Result: PageRankResult;

    fn calc(&self) -> Result<Self::Result>;
}

pub trait PageRankResult {
    fn page_rank(&self) -> &Scores;
    fn debug<'a>(&'a self, corpus: &'a Corpus) -> impl std::fmt::Debug + 'a;

    fn ranks(&self, corpus: &Corpus) -> RankVector {
        by_name(corpus, self.page_rank())
    }
}
