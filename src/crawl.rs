//! Builds a [`Corpus`] from a directory of HTML pages.

use crate::{corpus::Corpus, error::Result};
use regex::Regex;
use std::{collections::BTreeSet, fs, path::Path};

const HREF: &str = r#"<a\s+[^>]*?href="([^"]*)""#;

/// Reads every `*.html` file directly under `directory`.
///
/// Pages are named by file name. Links are the `href` targets of anchor
/// tags; links to files outside the directory and self-links are dropped.
pub fn crawl<P: AsRef<Path>>(directory: P) -> Result<Corpus> {
    let directory = directory.as_ref();
    let re = Regex::new(HREF)?;
    let mut pages = vec![];
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }
        let contents = fs::read_to_string(entry.path())?;
        let links: BTreeSet<String> = extract_links(&re, &contents)
            .map(str::to_string)
            .collect();
        pages.push((name.to_string(), links));
    }
    tracing::info!("Crawled {} pages from {}", pages.len(), directory.display());
    Corpus::new(pages)
}

fn extract_links<'a>(re: &'a Regex, contents: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(contents)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
}
