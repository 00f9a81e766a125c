//! Persisted UI preferences and the repository that backs them.

pub mod model;
pub mod repository;

pub use model::Theme;
pub use repository::StateRepository;
