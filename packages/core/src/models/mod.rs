//! Data structures for maps, nodes, connections and derived results

pub mod analysis;
pub mod mindmap;
pub mod node;

pub use analysis::{
    AnalysisResult, NodeSummary, StructureMetrics, Suggestion, SuggestionContext, SuggestionResult,
};
pub use mindmap::{Connection, MindMap, MindMapUpdate};
pub use node::{Node, NodeUpdate, Position, ValidationError};
