//! Campsite type classifier for a Thai camping / glamping platform.
//!
//! Assigns imported place records one of four accommodation types
//! (Camping, Glamping, Tented Resort, Bungalow) using bilingual keyword
//! heuristics, with an optional generative-model second opinion when the
//! heuristic is unsure.

pub mod classifier;
pub mod config;
pub mod place;
pub mod taxonomy;

pub use classifier::{Classification, ClassificationSource, TypeClassifier};
pub use place::{GooglePlace, PlaceCandidate};
pub use taxonomy::{CampsiteType, ClassificationResult};
