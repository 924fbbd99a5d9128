//! Higher-order networks built from subpath statistics
//!
//! An order-k network has one node per observed k-gram and one edge per
//! observed subpath of length k+1: the subpath `(x0, .., xk)` becomes the edge
//! `(x0, .., xk-1) -> (x1, .., xk)`, weighted by its count.
//!
//! ```text
//! subpaths (order 2)         order-2 network
//!   a b c  x2                (a,b) --2--> (b,c)
//!   a b d  x1                (a,b) --1--> (b,d)
//!   e b c  x4                (e,b) --4--> (b,c)
//! ```
//!
//! Because edges are derived only from windows, source and target always
//! overlap in exactly k-1 positions. Networks are immutable once built; when
//! statistics change they are rebuilt, never patched.

mod builder;
mod dof;
mod graph;

pub use builder::{build_network, BuildMode};
pub use dof::possible_degrees_of_freedom;
pub use graph::{HigherOrderEdge, HigherOrderNetwork, HigherOrderNode, KGram, NodeId};
