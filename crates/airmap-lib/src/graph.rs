//! Directed, weighted graph of uniquely coded nodes.
//!
//! Nodes live in an arena ordered by insertion; each node's position doubles
//! as its row and column in a dense weight matrix. Removing a node compacts
//! the arena and the matrix together so positional indices always describe
//! exactly the live node set.
//!
//! Read-only queries are exposed through [`GraphReader`] and mutation through
//! [`GraphWriter`], so callers can ask for the narrowest access they need.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::path::find_route_dijkstra;

/// Distance reported for node pairs that are not directly connected.
pub const NO_CONNECTION: f64 = f64::INFINITY;

/// Minimum Jaro-Winkler similarity for a code to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Maximum number of suggestions attached to a [`Error::NotFound`].
const MAX_SUGGESTIONS: usize = 3;

/// A graph vertex: a unique code plus an arbitrary payload.
///
/// Equality and hashing consider the code only.
#[derive(Debug, Clone)]
pub struct Node<T> {
    code: String,
    data: T,
}

impl<T> Node<T> {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl<T> Eq for Node<T> {}

impl<T> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// A present directed edge, borrowed from the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub distance: f64,
}

/// Read-only access to a graph.
pub trait GraphReader {
    type Payload;

    /// Whether a node with `code` exists.
    fn contains(&self, code: &str) -> bool;

    /// Look up a node by code.
    fn node(&self, code: &str) -> Option<&Node<Self::Payload>>;

    /// Weight of the edge `src -> dst`, or [`NO_CONNECTION`] when the edge is
    /// absent or either endpoint is unknown.
    fn distance_between(&self, src: &str, dst: &str) -> f64;

    /// Nodes reachable over one outbound edge, in insertion order.
    fn children(&self, code: &str) -> Result<Vec<&Node<Self::Payload>>>;

    /// Number of present outbound edges.
    fn out_degree(&self, code: &str) -> Result<usize>;

    /// Dijkstra shortest path from `src` to `dst`.
    ///
    /// Returns `None` when either endpoint is missing or `dst` cannot be
    /// reached.
    fn shortest_path(&self, src: &str, dst: &str) -> Option<Vec<String>>;

    /// Sum of consecutive leg distances. Empty and single-node paths have
    /// length zero; any missing leg makes the result infinite.
    fn path_length<S: AsRef<str>>(&self, path: &[S]) -> f64 {
        path.windows(2)
            .map(|leg| self.distance_between(leg[0].as_ref(), leg[1].as_ref()))
            .sum()
    }

    /// True when every node exists and every consecutive pair is connected.
    fn is_valid_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        path.iter().all(|code| self.contains(code.as_ref()))
            && self.path_length(path) < NO_CONNECTION
    }
}

/// Mutating access to a graph. Every operation either applies fully or
/// leaves the graph untouched.
pub trait GraphWriter: GraphReader {
    /// Insert a node with no edges. Rejects codes that already exist.
    fn add_node(&mut self, code: impl Into<String>, data: Self::Payload) -> Result<()>;

    /// Remove a node and every edge that touches it, returning its payload.
    fn remove_node(&mut self, code: &str) -> Result<Self::Payload>;

    /// Replace a node's payload, returning the previous one.
    fn set_node_data(&mut self, code: &str, data: Self::Payload) -> Result<Self::Payload>;

    /// Mutable access to a node's payload for in-place edits.
    fn node_data_mut(&mut self, code: &str) -> Result<&mut Self::Payload>;

    /// Set (or overwrite) the directed edge `src -> dst`.
    fn add_edge(&mut self, src: &str, dst: &str, distance: f64) -> Result<()>;

    /// Mark the directed edge `src -> dst` absent. Removing an edge that does
    /// not exist is a no-op.
    fn remove_edge(&mut self, src: &str, dst: &str) -> Result<()>;

    /// Set both `a -> b` and `b -> a` to `distance`.
    fn add_symmetric_edge(&mut self, a: &str, b: &str, distance: f64) -> Result<()> {
        // The reverse write cannot fail once the forward one succeeded: it
        // checks the same endpoints and distance.
        self.add_edge(a, b, distance)?;
        self.add_edge(b, a, distance)
    }
}

/// Graph ADT backed by a node arena and a dense weight matrix.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
    indices: HashMap<String, usize>,
    weights: Vec<Vec<Option<f64>>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            indices: HashMap::new(),
            weights: Vec::new(),
        }
    }
}

impl<T> Graph<T> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// All node codes in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|node| node.code.as_str())
    }

    /// Whether the directed edge `src -> dst` is present.
    pub fn has_edge(&self, src: &str, dst: &str) -> bool {
        match (self.index_of(src), self.index_of(dst)) {
            (Some(from), Some(to)) => self.weights[from][to].is_some(),
            _ => false,
        }
    }

    /// Every present directed edge, scanning sources then targets in
    /// insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.weights.iter().enumerate().flat_map(move |(from, row)| {
            row.iter().enumerate().filter_map(move |(to, weight)| {
                weight.map(|distance| Edge {
                    source: self.nodes[from].code.as_str(),
                    target: self.nodes[to].code.as_str(),
                    distance,
                })
            })
        })
    }

    /// Number of present directed edges.
    pub fn edge_count(&self) -> usize {
        self.weights
            .iter()
            .map(|row| row.iter().filter(|weight| weight.is_some()).count())
            .sum()
    }

    /// Codes that closely resemble `code`, best match first.
    pub fn suggest_codes(&self, code: &str, limit: usize) -> Vec<String> {
        let wanted = code.to_uppercase();
        let mut scored: Vec<(f64, &str)> = self
            .codes()
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&wanted, &candidate.to_uppercase()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    pub(crate) fn index_of(&self, code: &str) -> Option<usize> {
        self.indices.get(code).copied()
    }

    pub(crate) fn code_at(&self, index: usize) -> &str {
        &self.nodes[index].code
    }

    /// Outbound weights for the node at `index`, one slot per live node.
    pub(crate) fn row(&self, index: usize) -> &[Option<f64>] {
        &self.weights[index]
    }

    pub(crate) fn not_found(&self, code: &str) -> Error {
        Error::NotFound {
            code: code.to_string(),
            suggestions: self.suggest_codes(code, MAX_SUGGESTIONS),
        }
    }

    fn require(&self, code: &str) -> Result<usize> {
        self.index_of(code).ok_or_else(|| self.not_found(code))
    }
}

impl<T> GraphReader for Graph<T> {
    type Payload = T;

    fn contains(&self, code: &str) -> bool {
        self.indices.contains_key(code)
    }

    fn node(&self, code: &str) -> Option<&Node<T>> {
        self.index_of(code).map(|index| &self.nodes[index])
    }

    fn distance_between(&self, src: &str, dst: &str) -> f64 {
        match (self.index_of(src), self.index_of(dst)) {
            (Some(from), Some(to)) => self.weights[from][to].unwrap_or(NO_CONNECTION),
            _ => NO_CONNECTION,
        }
    }

    fn children(&self, code: &str) -> Result<Vec<&Node<T>>> {
        let index = self.require(code)?;
        Ok(self.weights[index]
            .iter()
            .zip(&self.nodes)
            .filter(|(weight, _)| weight.is_some())
            .map(|(_, node)| node)
            .collect())
    }

    fn out_degree(&self, code: &str) -> Result<usize> {
        let index = self.require(code)?;
        Ok(self.weights[index]
            .iter()
            .filter(|weight| weight.is_some())
            .count())
    }

    fn shortest_path(&self, src: &str, dst: &str) -> Option<Vec<String>> {
        find_route_dijkstra(self, src, dst)
    }
}

impl<T> GraphWriter for Graph<T> {
    fn add_node(&mut self, code: impl Into<String>, data: T) -> Result<()> {
        let code = code.into();
        if self.contains(&code) {
            return Err(Error::DuplicateNode { code });
        }

        let index = self.nodes.len();
        for row in &mut self.weights {
            row.push(None);
        }
        self.weights.push(vec![None; index + 1]);
        self.indices.insert(code.clone(), index);
        self.nodes.push(Node { code, data });
        Ok(())
    }

    fn remove_node(&mut self, code: &str) -> Result<T> {
        let index = self.require(code)?;

        let node = self.nodes.remove(index);
        self.weights.remove(index);
        for row in &mut self.weights {
            row.remove(index);
        }

        self.indices.remove(code);
        for (position, node) in self.nodes.iter().enumerate().skip(index) {
            self.indices.insert(node.code.clone(), position);
        }

        Ok(node.data)
    }

    fn set_node_data(&mut self, code: &str, data: T) -> Result<T> {
        let index = self.require(code)?;
        Ok(std::mem::replace(&mut self.nodes[index].data, data))
    }

    fn node_data_mut(&mut self, code: &str) -> Result<&mut T> {
        let index = self.require(code)?;
        Ok(&mut self.nodes[index].data)
    }

    fn add_edge(&mut self, src: &str, dst: &str, distance: f64) -> Result<()> {
        let from = self.require(src)?;
        let to = self.require(dst)?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::InvalidDistance { distance });
        }
        self.weights[from][to] = Some(distance);
        Ok(())
    }

    fn remove_edge(&mut self, src: &str, dst: &str) -> Result<()> {
        let from = self.require(src)?;
        let to = self.require(dst)?;
        self.weights[from][to] = None;
        Ok(())
    }
}
