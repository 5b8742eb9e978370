// src/core/mod.rs

/// Shared data models: fetch outcomes, classifications, scan records and
/// the error taxonomy.
pub mod models;

/// The static technology signature catalog consulted by the classifier.
pub mod catalog;

/// Domain normalization using public-suffix rules.
pub mod domain;

/// The scan pipeline: fetcher, classifier, identity resolver and the
/// batch orchestrator.
pub mod scanner;
