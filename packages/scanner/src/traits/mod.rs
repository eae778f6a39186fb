//! Core trait abstractions for the scanner library.

pub mod fetcher;
