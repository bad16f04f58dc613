//! geiton: in-memory approximate nearest neighbor search.
//!
//! An incremental [HNSW](hnsw) (Hierarchical Navigable Small World) index
//! over dense `f32` vectors under Euclidean distance. The index supports
//! two operations: insert a vector, and fetch the top-k nearest neighbors
//! of a query. Both serialize behind one exclusive lock, so a shared
//! [`HnswIndex`] composes operations in submission order.
//!
//! # Quick Start
//!
//! ```
//! use geiton::HnswIndex;
//!
//! # fn main() -> geiton::Result<()> {
//! // Degree cap M = 16, construction beam width ef = 200.
//! let index = HnswIndex::new(16, 200)?;
//!
//! index.insert(vec![1.0, 2.0])?;
//! index.insert(vec![3.0, 4.0])?;
//! index.insert(vec![5.0, 6.0])?;
//!
//! let hits = index.search(&[3.1, 3.9], 2)?;
//! assert_eq!(hits[0].vector, vec![3.0, 4.0]);
//! # Ok(())
//! # }
//! ```
//!
//! # Trade-offs
//!
//! | Knob | Effect |
//! |------|--------|
//! | `m`  | Per-layer degree cap. Larger = denser graph, better recall, more memory. |
//! | `ef` | Construction beam width. Larger = better neighbor selection, slower inserts. |
//! | `k`  | Doubles as the search beam width: larger k explores more of the base layer. |
//!
//! The dimension is fixed by the first inserted vector; every later insert
//! and every query must match it. Deletion, non-Euclidean metrics, and
//! persistence are out of scope.

pub mod distance;
pub mod error;
pub mod hnsw;

pub use error::{IndexError, Result};
pub use hnsw::{HnswIndex, HnswParams, Neighbor};
