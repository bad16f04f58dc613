//! Index ownership, configuration, and the public API.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::hnsw::insert;
use crate::hnsw::node::Node;
use crate::hnsw::search::search_layer;

/// Tuning parameters for an [`HnswIndex`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnswParams {
    /// Maximum neighbors per node per layer.
    pub m: usize,
    /// Candidate list size while inserting (the construction beam width).
    pub ef: usize,
    /// Seed for the layer-assignment RNG. `None` draws a fresh seed; a
    /// fixed seed makes graph construction reproducible for a fixed
    /// insertion order.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            m: 16,
            ef: 200,
            seed: None,
        }
    }
}

/// A search hit: the node's stable id, its distance to the query, and a
/// copy of its vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Stable id assigned at insertion (the i-th insert gets id `i`).
    pub id: u32,
    /// Euclidean distance to the query.
    pub distance: f32,
    /// The indexed vector.
    pub vector: Vec<f32>,
}

/// Mutable graph state; every access goes through the index lock.
#[derive(Debug)]
pub(crate) struct Graph {
    pub(crate) params: HnswParams,
    /// `1 / ln(m)`, the scale factor of the layer-assignment distribution.
    pub(crate) level_mult: f64,
    /// Node arena. Adjacency lists hold indices into this vector; node 0
    /// is the permanent entry point.
    pub(crate) nodes: Vec<Node>,
    /// Fixed by the first insert.
    pub(crate) dimension: Option<usize>,
    pub(crate) rng: StdRng,
}

/// In-memory HNSW index over `f32` vectors under Euclidean distance.
///
/// Supports incremental insertion and top-k queries. Both operations take
/// one process-wide exclusive lock for their full duration, so a shared
/// `HnswIndex` serializes all access in submission order.
///
/// ```
/// use geiton::HnswIndex;
///
/// # fn main() -> geiton::Result<()> {
/// let index = HnswIndex::new(16, 200)?;
/// index.insert(vec![0.0, 1.0])?;
/// index.insert(vec![1.0, 0.0])?;
///
/// let hits = index.search(&[0.1, 0.9], 1)?;
/// assert_eq!(hits[0].id, 0);
/// assert_eq!(hits[0].vector, vec![0.0, 1.0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HnswIndex {
    graph: Mutex<Graph>,
}

impl HnswIndex {
    /// Construct an empty index with degree cap `m` and construction beam
    /// width `ef`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `m >= 2` and `ef >= 1`.
    pub fn new(m: usize, ef: usize) -> Result<Self> {
        Self::with_params(HnswParams {
            m,
            ef,
            ..HnswParams::default()
        })
    }

    /// Construct an empty index from explicit parameters.
    pub fn with_params(params: HnswParams) -> Result<Self> {
        if params.m < 2 {
            return Err(IndexError::InvalidParameter(format!(
                "m must be at least 2, got {}",
                params.m
            )));
        }
        if params.ef < 1 {
            return Err(IndexError::InvalidParameter(format!(
                "ef must be at least 1, got {}",
                params.ef
            )));
        }

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let level_mult = 1.0 / (params.m as f64).ln();
        Ok(Self {
            graph: Mutex::new(Graph {
                params,
                level_mult,
                nodes: Vec::new(),
                dimension: None,
                rng: StdRng::seed_from_u64(seed),
            }),
        })
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    /// `true` if nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension, fixed by the first insert; `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.lock().dimension
    }

    /// Insert a vector. Its node id is the index's size before the call.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when the length differs from the dimension
    /// fixed by the first insert.
    pub fn insert(&self, vector: Vec<f32>) -> Result<()> {
        let mut graph = self.lock();
        match graph.dimension {
            None => graph.dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            Some(_) => {}
        }
        insert::insert(&mut graph, vector);
        Ok(())
    }

    /// Return up to `k` nearest neighbors of `query`, ascending by
    /// Euclidean distance.
    ///
    /// # Errors
    ///
    /// `EmptyIndex` before the first insert, `DimensionMismatch` for a
    /// query of the wrong length, `InvalidParameter` for `k = 0`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(IndexError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }

        let graph = self.lock();
        if graph.nodes.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if let Some(expected) = graph.dimension {
            if expected != query.len() {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        // Greedy descent from the entry point to layer 1, then a beam
        // search over the base layer.
        let mut ep: u32 = 0;
        for layer in (1..=graph.nodes[0].top_layer()).rev() {
            ep = search_layer(&graph.nodes, ep, query, 1, layer)[0].0;
        }
        let hits = search_layer(&graph.nodes, ep, query, k, 0);

        Ok(hits
            .into_iter()
            .map(|(id, distance)| Neighbor {
                id,
                distance,
                vector: graph.nodes[id as usize].vector().to_vec(),
            })
            .collect())
    }

    /// Copy of the vector stored under `id`, if any.
    pub fn vector(&self, id: u32) -> Option<Vec<f32>> {
        self.lock()
            .nodes
            .get(id as usize)
            .map(|n| n.vector().to_vec())
    }

    /// Number of adjacency layers of node `id` (its top layer plus one).
    ///
    /// Diagnostic accessor; the layer structure is not part of the stable
    /// contract.
    pub fn layer_count(&self, id: u32) -> Option<usize> {
        self.lock()
            .nodes
            .get(id as usize)
            .map(|n| n.top_layer() + 1)
    }

    /// Neighbor ids of node `id` at `layer` (empty when the node does not
    /// reach the layer).
    ///
    /// Diagnostic accessor; adjacency is not part of the stable contract
    /// and mutual adjacency is best-effort above layer 0.
    pub fn neighbors(&self, id: u32, layer: usize) -> Option<Vec<u32>> {
        self.lock()
            .nodes
            .get(id as usize)
            .map(|n| n.friends(layer).to_vec())
    }

    /// A poisoned lock only records that an earlier operation panicked;
    /// the guard itself is still usable.
    fn lock(&self) -> MutexGuard<'_, Graph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
