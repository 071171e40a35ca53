use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::kegg::KeggClient;
use crate::parser::parse_list_lines;

/// Description returned for a KO that is not in the catalog.
pub const FUNCTION_NOT_FOUND: &str = "Function not found";

/// Read-only KO -> description map built from `/list/ko`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KoFunctionCatalog {
    functions: HashMap<String, String>,
}

impl KoFunctionCatalog {
    pub fn from_listing(text: &str) -> Self {
        Self {
            functions: parse_list_lines(text).into_iter().collect(),
        }
    }

    /// Fetches the full listing. Any upstream failure degrades to an empty
    /// catalog, in which case every lookup yields [`FUNCTION_NOT_FOUND`].
    pub fn load<K: KeggClient + ?Sized>(client: &K) -> Self {
        match client.list_ko() {
            Ok(body) => {
                let catalog = Self::from_listing(&body);
                info!(entries = catalog.len(), "loaded KO function catalog");
                catalog
            }
            Err(err) => {
                warn!(error = %err, "KO function catalog unavailable, descriptions disabled");
                Self::default()
            }
        }
    }

    pub fn lookup(&self, ko_id: &str) -> &str {
        self.functions
            .get(ko_id)
            .map(String::as_str)
            .unwrap_or(FUNCTION_NOT_FOUND)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<(String, String)> for KoFunctionCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            functions: iter.into_iter().collect(),
        }
    }
}

/// Holds the catalog for one session. The listing is fetched on first use
/// and never again, including when that first fetch degraded to empty.
#[derive(Debug, Default)]
pub struct CatalogCache {
    cell: OnceLock<Arc<KoFunctionCatalog>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<K: KeggClient + ?Sized>(&self, client: &K) -> Arc<KoFunctionCatalog> {
        self.cell
            .get_or_init(|| Arc::new(KoFunctionCatalog::load(client)))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
