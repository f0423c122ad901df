mod common;
pub use self::common::*;
pub mod corpus;
pub use self::corpus::Corpus;
pub mod crawl;
pub use self::crawl::crawl;
mod error;
pub use self::error::{Error, Result};

pub mod page_rank;
pub use self::page_rank::{iterate_rank, rank_both, sample_rank, transition};
