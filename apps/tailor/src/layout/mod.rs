// Markdown → paginated PDF rendering.
// Classifier and engine share the tier table in font_metrics; the engine only
// talks to the DocumentSink trait. Rendering is CPU-bound: call it from
// tokio::task::spawn_blocking.

pub mod classifier;
pub mod engine;
pub mod font_metrics;
pub mod pdf;
pub mod sink;

// Re-export the public API consumed by the tailoring pipeline.
pub use engine::render_markdown;
pub use font_metrics::PageMetrics;
pub use sink::{RenderedDocument, SinkError};
