//! In-memory storage implementation for portfolios.

mod repository;

#[cfg(test)]
mod repository_tests;
