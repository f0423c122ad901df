use crate::error::{Error, Result};
use algograph::graph::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A closed set of pages and the links among them.
///
/// Pages are vertices of a directed [`algograph`] graph and every link is an
/// edge. Construction drops self-links, links to pages outside the corpus and
/// repeated links, so each page's out-edges form a set of other pages.
/// A page without out-edges is *dangling*; the estimators treat it as linking
/// to every page, itself included.
#[derive(Clone)]
pub struct Corpus {
    graph: directed::TreeBackedGraph,
    vertices: BTreeMap<String, VertexId>,
    names: HashMap<VertexId, String, ahash::RandomState>,
}

impl Corpus {
    /// Builds a corpus from `(page, links)` pairs.
    ///
    /// Fails with [`Error::InvalidGraph`] on an empty input or when a page
    /// name occurs twice.
    pub fn new<P, S, L>(pages: P) -> Result<Self>
    where
        P: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut raw: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (page, links) in pages {
            let page = page.into();
            let links = links.into_iter().map(Into::into).collect();
            if raw.contains_key(&page) {
                return Err(Error::InvalidGraph(format!("duplicated page: {page}")));
            }
            raw.insert(page, links);
        }
        if raw.is_empty() {
            return Err(Error::InvalidGraph("no pages".to_string()));
        }

        let mut graph = directed::TreeBackedGraph::new();
        let mut vertices = BTreeMap::new();
        let mut names = HashMap::with_hasher(ahash::RandomState::new());
        for page in raw.keys() {
            let v = graph.add_vertex();
            vertices.insert(page.clone(), v);
            names.insert(v, page.clone());
        }
        let mut dropped = 0usize;
        for (page, links) in raw.iter() {
            let u = vertices[page];
            for link in links.iter() {
                match vertices.get(link) {
                    Some(v) if *v != u => {
                        graph.add_edge(u, *v);
                    }
                    _ => dropped += 1,
                }
            }
        }
        tracing::debug!(
            pages = vertices.len(),
            links = graph.edge_size(),
            dropped,
            "corpus built"
        );
        Ok(Self {
            graph,
            vertices,
            names,
        })
    }

    /// Number of pages. Never zero.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Page names in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.vertices.keys().map(String::as_str)
    }

    /// Vertices in the order of their page names.
    pub fn iter_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.values().copied()
    }

    pub fn contains(&self, page: &str) -> bool {
        self.vertices.contains_key(page)
    }

    pub fn vertex(&self, page: &str) -> Option<VertexId> {
        self.vertices.get(page).copied()
    }

    pub fn name(&self, v: &VertexId) -> Option<&str> {
        self.names.get(v).map(String::as_str)
    }

    /// Outgoing links of `page`, sorted by name. `None` for unknown pages.
    pub fn links(&self, page: &str) -> Option<Vec<&str>> {
        let u = self.vertex(page)?;
        let mut links: Vec<_> = self
            .graph
            .out_edges(&u)
            .filter_map(|e| self.name(&e.sink))
            .collect();
        links.sort_unstable();
        Some(links)
    }

    /// Link targets of `v`. Empty for dangling pages.
    pub fn successors(&self, v: &VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.out_edges(v).map(|e| e.sink)
    }

    pub fn out_degree(&self, v: &VertexId) -> usize {
        self.graph.out_edges(v).count()
    }

    pub fn is_dangling(&self, v: &VertexId) -> bool {
        self.out_degree(v) == 0
    }

    pub fn graph(&self) -> &directed::TreeBackedGraph {
        &self.graph
    }
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for page in self.pages() {
            map.entry(&page, &self.links(page).unwrap_or_default());
        }
        map.finish()
    }
}

#[cfg(test)]
pub(crate) fn fixture(pages: &[(&str, &[&str])]) -> Corpus {
    Corpus::new(pages.iter().map(|(p, ls)| (*p, ls.iter().copied()))).unwrap()
}
