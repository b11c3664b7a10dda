//! Graph store: node identities, current and initial colors, adjacency.

use std::collections::{BTreeMap, HashMap};

use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};
use rayon::slice::ParallelSlice;

use crate::error::{Error, Result};

/// External, user-facing node identity.
pub type NodeId = u32;

/// Partition label.
pub type Color = u32;

/// Position of a node in the graph's processing order, `0..nvertices()`.
pub type Vertex = usize;

/// A node as supplied to [`Graph::new`]: its id, initial color, and the ids
/// of its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub color: Color,
    pub neighbors: Vec<NodeId>,
}

impl Node {
    pub fn new(id: NodeId, color: Color, neighbors: Vec<NodeId>) -> Self {
        Self {
            id,
            color,
            neighbors,
        }
    }
}

/// A read-only snapshot of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    pub color: Color,
    pub initial_color: Color,
    pub degree: usize,
}

/// A compact adjacency list whose topology is fixed at construction.
///
/// Nodes keep the order they were supplied in. That order is both the
/// index space for uniform sampling and the order nodes are visited in
/// every round, so it is captured once here rather than left to whatever
/// a hash map happens to iterate in.
///
/// Only colors change after construction.
pub struct Graph {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, Vertex>,
    offsets: Vec<usize>,
    neighbors: Vec<Vertex>,
    colors: Vec<Color>,
    initial_colors: Vec<Color>,
}

impl Graph {
    /// Builds a closed graph: every neighbor id must itself be one of the
    /// supplied nodes. Links are taken as given, so an undirected edge
    /// should appear in both endpoints' lists.
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let nodes: Vec<Node> = nodes.into_iter().collect();

        let mut index = HashMap::with_capacity(nodes.len());
        for (v, node) in nodes.iter().enumerate() {
            if index.insert(node.id, v).is_some() {
                return Err(Error::DuplicateNode(node.id));
            }
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        offsets.push(0);
        let mut neighbors = Vec::with_capacity(nodes.iter().map(|n| n.neighbors.len()).sum());
        for node in &nodes {
            for &neighbor in &node.neighbors {
                let w = *index.get(&neighbor).ok_or(Error::GraphIntegrity {
                    node: node.id,
                    neighbor,
                })?;
                neighbors.push(w);
            }
            offsets.push(neighbors.len());
        }

        let ids = nodes.iter().map(|n| n.id).collect();
        let colors: Vec<Color> = nodes.iter().map(|n| n.color).collect();
        let initial_colors = colors.clone();

        Ok(Self {
            ids,
            index,
            offsets,
            neighbors,
            colors,
            initial_colors,
        })
    }

    pub fn nvertices(&self) -> usize {
        self.ids.len()
    }

    /// Undirected edge count, assuming every link is listed from both ends.
    pub fn nedges(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// All node ids in processing order. Stable for the lifetime of the graph.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn vertex(&self, id: NodeId) -> Result<Vertex> {
        self.index.get(&id).copied().ok_or(Error::NotFound(id))
    }

    pub fn node(&self, id: NodeId) -> Result<NodeView> {
        let v = self.vertex(id)?;
        Ok(NodeView {
            id,
            color: self.colors[v],
            initial_color: self.initial_colors[v],
            degree: self.degree(v),
        })
    }

    pub fn neighbors_of(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let v = self.vertex(id)?;
        Ok(self.neighbors(v).iter().map(|&w| self.ids[w]).collect())
    }

    /// Unchecked assignment: any color is accepted and nothing else changes.
    pub fn set_color(&mut self, id: NodeId, color: Color) -> Result<()> {
        let v = self.vertex(id)?;
        self.colors[v] = color;
        Ok(())
    }

    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        &self.neighbors[self.offsets[v]..self.offsets[v + 1]]
    }

    pub fn degree(&self, v: Vertex) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    pub fn max_degree(&self) -> usize {
        self.offsets
            .par_windows(2)
            .map(|s| s[1] - s[0])
            .max()
            .unwrap_or(0)
    }

    pub fn is_adjacent(&self, u: Vertex, v: Vertex) -> bool {
        self.neighbors(u).contains(&v)
    }

    pub fn color(&self, v: Vertex) -> Color {
        self.colors[v]
    }

    /// Current colors, indexed by [`Vertex`].
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Exchanges the colors of two nodes.
    pub fn swap_colors(&mut self, u: Vertex, v: Vertex) {
        self.colors.swap(u, v);
    }

    /// Number of undirected edges whose endpoints differ in color.
    ///
    /// Every link is visited from both ends, so the directed mismatch count
    /// is halved.
    pub fn edge_cut(&self) -> usize {
        let gray_links: usize = (0..self.nvertices())
            .into_par_iter()
            .map(|v| {
                let c = self.colors[v];
                self.neighbors(v)
                    .iter()
                    .filter(|&&w| self.colors[w] != c)
                    .count()
            })
            .sum();
        gray_links / 2
    }

    /// Number of nodes whose color differs from their initial color.
    pub fn migrations(&self) -> usize {
        self.colors
            .par_iter()
            .zip(self.initial_colors.par_iter())
            .filter(|(c, i)| c != i)
            .count()
    }

    /// Node count per color.
    pub fn partition_sizes(&self) -> BTreeMap<Color, usize> {
        let mut sizes = BTreeMap::new();
        for &c in &self.colors {
            *sizes.entry(c).or_default() += 1;
        }
        sizes
    }
}
