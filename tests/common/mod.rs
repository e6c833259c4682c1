#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use std::sync::Arc;
use dwarf::api::routes::public_routes;
use dwarf::domain::repositories::{CounterStore, RecordRepository};
use dwarf::infrastructure::counter::MemoryCounterStore;
use dwarf::infrastructure::persistence::MemoryRecordRepository;
use dwarf::state::AppState;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_BASE_URL: &str = "http://s.test";

/// In-memory stores kept alongside the state so tests can inspect them.
pub struct TestContext {
    pub records: Arc<MemoryRecordRepository>,
    pub counter: Arc<MemoryCounterStore>,
    pub state: AppState,
}

pub fn create_test_context() -> TestContext {
    let records = Arc::new(MemoryRecordRepository::new());
    let counter = Arc::new(MemoryCounterStore::new());

    let state = AppState::new(
        records.clone() as Arc<dyn RecordRepository>,
        counter.clone() as Arc<dyn CounterStore>,
        TEST_API_KEY,
        TEST_BASE_URL,
    );

    TestContext {
        records,
        counter,
        state,
    }
}

pub fn create_test_server(state: AppState) -> TestServer {
    let app: Router = public_routes().with_state(state);
    TestServer::new(app).unwrap()
}
