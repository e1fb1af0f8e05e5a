//! Application layer with the resolution pipeline and its resolvers.

/// Per-kind token resolvers.
pub mod resolvers;
/// Pipeline services.
pub mod services;

pub use resolvers::{ResolveContext, Resolution, ResolverSet, TokenResolver};
pub use services::{
    Aggregator, ImageFetchService, PipelineServices, RenderCoordinator, RenderPipeline,
    RenderRequest, RenderedText, TextFormatter,
};
