//! Business logic services.

pub mod resolver;

pub use resolver::{FetchOutcome, PdfResolver, ResolutionStrategy, ResolverSettings};
