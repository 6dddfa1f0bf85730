//! The set of stores a view reads from.

use super::{DynamicStore, RecordStore};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::property::PropertyChain;
use crate::record::{NodeRecord, PropertyRecord, RelationshipRecord};
use recordview_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::path::Path;
use tracing::info;

/// Backends for each store, in the order they are opened.
pub struct StoreBackends {
    /// Node records.
    pub nodes: Box<dyn StorageBackend>,
    /// Relationship records.
    pub relationships: Box<dyn StorageBackend>,
    /// Property records.
    pub properties: Box<dyn StorageBackend>,
    /// String payloads.
    pub strings: Box<dyn StorageBackend>,
    /// Array payloads.
    pub arrays: Box<dyn StorageBackend>,
    /// Label arrays of nodes with many labels.
    pub labels: Box<dyn StorageBackend>,
}

impl StoreBackends {
    /// Fresh in-memory backends.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            nodes: Box::new(InMemoryBackend::new()),
            relationships: Box::new(InMemoryBackend::new()),
            properties: Box::new(InMemoryBackend::new()),
            strings: Box::new(InMemoryBackend::new()),
            arrays: Box::new(InMemoryBackend::new()),
            labels: Box::new(InMemoryBackend::new()),
        }
    }
}

/// Node, relationship, property and dynamic stores opened together.
#[derive(Debug)]
pub struct Stores {
    nodes: RecordStore<NodeRecord>,
    relationships: RecordStore<RelationshipRecord>,
    properties: RecordStore<PropertyRecord>,
    strings: DynamicStore,
    arrays: DynamicStore,
    labels: DynamicStore,
    config: Config,
}

impl Stores {
    /// Node store file name.
    pub const NODE_FILE: &'static str = "nodes.db";
    /// Relationship store file name.
    pub const RELATIONSHIP_FILE: &'static str = "relationships.db";
    /// Property store file name.
    pub const PROPERTY_FILE: &'static str = "properties.db";
    /// String store file name.
    pub const STRING_FILE: &'static str = "strings.db";
    /// Array store file name.
    pub const ARRAY_FILE: &'static str = "arrays.db";
    /// Label store file name.
    pub const LABEL_FILE: &'static str = "labels.db";

    /// Opens stores over the given backends.
    ///
    /// # Errors
    ///
    /// Fails for an invalid dynamic record size and backend errors.
    pub fn new(backends: StoreBackends, config: Config) -> CoreResult<Self> {
        let dynamic = |name: &'static str, backend: Box<dyn StorageBackend>| {
            DynamicStore::new(
                name,
                backend,
                config.dynamic_record_size,
                config.max_dynamic_chain_length,
            )
        };
        Ok(Self {
            nodes: RecordStore::new(backends.nodes, NodeRecord::SIZE)?,
            relationships: RecordStore::new(backends.relationships, RelationshipRecord::SIZE)?,
            properties: RecordStore::new(backends.properties, PropertyRecord::SIZE)?,
            strings: dynamic("string", backends.strings)?,
            arrays: dynamic("array", backends.arrays)?,
            labels: dynamic("label", backends.labels)?,
            config,
        })
    }

    /// Opens empty in-memory stores.
    ///
    /// # Errors
    ///
    /// Fails for an invalid dynamic record size.
    pub fn in_memory(config: Config) -> CoreResult<Self> {
        Self::new(StoreBackends::in_memory(), config)
    }

    /// Opens the store files in `dir`.
    ///
    /// Missing files are created when `config.create_if_missing` is set.
    ///
    /// # Errors
    ///
    /// Fails if the directory or a file is missing and creation is disabled,
    /// and for I/O errors.
    pub fn open(dir: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            if !config.create_if_missing {
                return Err(CoreError::invalid_operation(format!(
                    "store directory {} does not exist",
                    dir.display()
                )));
            }
            std::fs::create_dir_all(dir)?;
        }

        let open = |file: &str| -> CoreResult<Box<dyn StorageBackend>> {
            let path = dir.join(file);
            let backend = if config.create_if_missing {
                FileBackend::open(&path)?
            } else {
                FileBackend::open_existing(&path)?
            };
            Ok(Box::new(backend))
        };
        let backends = StoreBackends {
            nodes: open(Self::NODE_FILE)?,
            relationships: open(Self::RELATIONSHIP_FILE)?,
            properties: open(Self::PROPERTY_FILE)?,
            strings: open(Self::STRING_FILE)?,
            arrays: open(Self::ARRAY_FILE)?,
            labels: open(Self::LABEL_FILE)?,
        };

        let stores = Self::new(backends, config)?;
        info!(
            path = %dir.display(),
            nodes = stores.nodes.high_id()?,
            relationships = stores.relationships.high_id()?,
            "opened stores"
        );
        Ok(stores)
    }

    /// Node store.
    #[must_use]
    pub fn nodes(&self) -> &RecordStore<NodeRecord> {
        &self.nodes
    }

    /// Relationship store.
    #[must_use]
    pub fn relationships(&self) -> &RecordStore<RelationshipRecord> {
        &self.relationships
    }

    /// Property store.
    #[must_use]
    pub fn properties(&self) -> &RecordStore<PropertyRecord> {
        &self.properties
    }

    /// String store.
    #[must_use]
    pub fn strings(&self) -> &DynamicStore {
        &self.strings
    }

    /// Array store.
    #[must_use]
    pub fn arrays(&self) -> &DynamicStore {
        &self.arrays
    }

    /// Label store.
    #[must_use]
    pub fn labels(&self) -> &DynamicStore {
        &self.labels
    }

    /// Configuration the stores were opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Walks the property chain starting at `head`.
    #[must_use]
    pub fn property_chain(&self, head: Option<u64>) -> PropertyChain<'_> {
        PropertyChain::new(&self.properties, head, self.config.max_property_chain_length)
    }

    /// Flushes every store.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn flush(&self) -> CoreResult<()> {
        self.nodes.flush()?;
        self.relationships.flush()?;
        self.properties.flush()?;
        self.strings.records().flush()?;
        self.arrays.records().flush()?;
        self.labels.records().flush()
    }
}
