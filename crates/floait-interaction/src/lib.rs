//! floait-interaction: remote completion clients for the floAiT engine.

pub mod completion;

pub use completion::HttpCompletionService;
