use std::sync::Arc;

use axum_test::TestServer;
use slotkeeper_api::{build_router, ApiState};
use slotkeeper_core::{AvailabilityEngine, EngineConfig, Stores};
use slotkeeper_db::MemoryStore;
use uuid::Uuid;

/// Monday 2025-03-10.
pub const MONDAY: &str = "2025-03-10";

pub struct TestContext {
    pub server: TestServer,
    pub org_id: Uuid,
    pub provider_id: Uuid,
}

impl TestContext {
    /// Server over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_stores(Stores::shared(Arc::new(MemoryStore::new())))
    }

    pub fn with_stores(stores: Stores) -> Self {
        let engine = AvailabilityEngine::new(stores, EngineConfig::default());
        let state = Arc::new(ApiState {
            engine,
            storage: "memory",
        });
        let server = TestServer::new(build_router(state)).unwrap();

        Self {
            server,
            org_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
        }
    }

    /// `/api/organizations/{org}/providers/{provider}{suffix}`
    pub fn provider_path(&self, suffix: &str) -> String {
        format!(
            "/api/organizations/{}/providers/{}{}",
            self.org_id, self.provider_id, suffix
        )
    }
}
