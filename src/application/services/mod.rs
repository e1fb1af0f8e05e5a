pub mod aggregator;
pub mod image_fetch_service;
pub mod markdown_parser;
pub mod pipeline;
pub mod render_coordinator;
pub mod text_formatter;
pub mod token_classifier;
pub mod tokenizer;

pub use aggregator::{Aggregator, CompletionCallback, JobState};
pub use image_fetch_service::ImageFetchService;
pub use pipeline::{PipelineServices, RenderPipeline, RenderRequest};
pub use render_coordinator::{RenderCoordinator, RenderedText};
pub use text_formatter::TextFormatter;
