//! Published API extraction engine.
//!
//! Raw documentation graph → `FilteringView(InclusionPolicy)` → filtered
//! view → `WhitelistEmitter`. The graph comes either from Java sources
//! (`loader`) or from a JSON snapshot produced elsewhere.

pub mod emitter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod view;

pub use emitter::{Whitelist, WhitelistEmitter};
pub use model::{Answer, DocGraph, DocNode, GraphBuilder, NodeId, NodeKind, Query, RawNode};
pub use pipeline::{PipelineReport, WhitelistPipeline};
pub use policy::InclusionPolicy;
pub use view::{FilteredNode, FilteringView, Verdict};
