use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::catalog::{CatalogCache, KoFunctionCatalog};
use crate::domain::OrganismRequest;
use crate::kegg::KeggClient;
use crate::report::{OrganismError, ProgressSink, build_report};

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub include_functions: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            include_functions: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub report: String,
    pub requested: usize,
    pub sections: usize,
    pub records: usize,
    pub include_functions: bool,
    pub errors: Vec<OrganismError>,
}

impl FetchResult {
    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.sections == 0
    }
}

/// One user session: the KEGG client plus the lazily loaded catalog.
pub struct App<K: KeggClient> {
    client: K,
    catalog: CatalogCache,
}

impl<K: KeggClient> App<K> {
    pub fn new(client: K) -> Self {
        Self {
            client,
            catalog: CatalogCache::new(),
        }
    }

    pub fn client(&self) -> &K {
        &self.client
    }

    /// The session's KO catalog, fetched on the first call only.
    pub fn catalog(&self) -> Arc<KoFunctionCatalog> {
        self.catalog.get_or_load(&self.client)
    }

    pub fn fetch(
        &self,
        requests: &[OrganismRequest],
        options: FetchOptions,
        sink: &dyn ProgressSink,
    ) -> FetchResult {
        let catalog = if options.include_functions && !requests.is_empty() {
            self.catalog()
        } else {
            Arc::new(KoFunctionCatalog::default())
        };

        info!(
            organisms = requests.len(),
            include_functions = options.include_functions,
            "building KO report"
        );
        let outcome = build_report(
            &self.client,
            requests,
            &catalog,
            options.include_functions,
            sink,
        );

        FetchResult {
            report: outcome.text(),
            requested: requests.len(),
            sections: outcome.report.sections.len(),
            records: outcome.report.record_count(),
            include_functions: options.include_functions,
            errors: outcome.errors,
        }
    }
}
