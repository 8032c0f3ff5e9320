//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wrapping an in-memory repository and the API router
//! - Helper functions for creating content items
//!
//! No external services are needed; every test runs against memory.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;

use literacy_content_backend::{build_router, AppState};
use literacy_core::{ContentItem, InMemoryContentRepository};

/// Test context holding the repository behind the router.
pub struct TestContext {
    pub repo: Arc<InMemoryContentRepository>,
    app: Router,
}

impl TestContext {
    /// Create a context seeded with `items`. Sampling is deterministic.
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self::with_timeout(items, None)
    }

    /// Create a context whose searches carry a deadline.
    pub fn with_timeout(items: Vec<ContentItem>, timeout: Option<Duration>) -> Self {
        let repo = Arc::new(InMemoryContentRepository::with_seed(items, 42));
        let state = AppState::new(repo.clone()).with_search_timeout(timeout);
        let app = build_test_router(state);
        Self { repo, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}

/// Build the test router with all routes.
fn build_test_router(state: AppState) -> Router {
    build_router(state)
}
