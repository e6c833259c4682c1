//! Shared state handed to every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, CounterService, LookupService, ShortenService};
use crate::domain::repositories::{CounterStore, RecordRepository};
use crate::infrastructure::Stores;

pub type DynShortenService = ShortenService<dyn RecordRepository, dyn CounterStore>;
pub type DynLookupService = LookupService<dyn RecordRepository>;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<DynShortenService>,
    pub lookup_service: Arc<DynLookupService>,
    pub auth_service: Arc<AuthService>,
    pub records: Arc<dyn RecordRepository>,
    pub counter: Arc<dyn CounterStore>,
    pub base_url: String,
    /// Redirect target for unknown codes; a JSON 404 is returned when unset.
    pub not_found_redirect: Option<String>,
}

impl AppState {
    /// Wires the services around the given stores.
    pub fn new(
        records: Arc<dyn RecordRepository>,
        counter: Arc<dyn CounterStore>,
        api_key: &str,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let shorten_service = Arc::new(ShortenService::new(
            records.clone(),
            CounterService::new(counter.clone()),
            base_url.clone(),
        ));
        let lookup_service = Arc::new(LookupService::new(records.clone()));
        let auth_service = Arc::new(AuthService::new(api_key));

        Self {
            shorten_service,
            lookup_service,
            auth_service,
            records,
            counter,
            base_url,
            not_found_redirect: None,
        }
    }

    /// Builds the state from connected stores.
    pub fn from_stores(stores: &Stores, api_key: &str, base_url: impl Into<String>) -> Self {
        Self::new(stores.records.clone(), stores.counter.clone(), api_key, base_url)
    }

    pub fn with_not_found_redirect(mut self, url: Option<String>) -> Self {
        self.not_found_redirect = url;
        self
    }
}
