/// In-process table store
///
/// A thread-safe store of named tables whose relations are lazy: building a
/// relation and adding filters touches no data, and every operation that
/// does read data is counted as one query against the store.
use crate::held::{invoke_on_rows, Held};
use crate::relation::Relation;
use maybe_loaded_core::predicate;
use maybe_loaded_core::{Error, FilterSpec, Result, Row, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Handle to the store; clones share the same tables.
#[derive(Clone, Default)]
pub struct TableStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    queries: AtomicU64,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to `table`, creating the table if needed
    pub fn insert(&self, table: &str, row: Row) -> Result<()> {
        self.insert_many(table, std::iter::once(row))
    }

    pub fn insert_many<I>(&self, table: &str, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut tables = self.inner.tables.write().map_err(|_| Error::LockPoisoned)?;
        tables.entry(table.to_string()).or_default().extend(rows);
        Ok(())
    }

    /// A lazy relation over every row of `table`
    pub fn relation(&self, table: &str) -> StoreRelation {
        StoreRelation {
            store: self.clone(),
            table: table.to_string(),
            filters: Vec::new(),
            loaded: None,
        }
    }

    /// Number of queries executed against the store so far
    pub fn queries_executed(&self) -> u64 {
        self.inner.queries.load(Ordering::Relaxed)
    }

    fn execute(&self, table: &str, filters: &[FilterSpec]) -> Result<Vec<Row>> {
        self.inner.queries.fetch_add(1, Ordering::Relaxed);
        debug!(table, filters = filters.len(), "executing store query");

        let tables = self.inner.tables.read().map_err(|_| Error::LockPoisoned)?;
        let mut rows = tables.get(table).cloned().unwrap_or_default();
        drop(tables);

        for spec in filters {
            rows = predicate::filter_all(&rows, spec)?;
        }
        Ok(rows)
    }
}

impl std::fmt::Debug for TableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableStore")
            .field("queries_executed", &self.queries_executed())
            .finish_non_exhaustive()
    }
}

/// Lazy relation over one table of a [`TableStore`]
#[derive(Debug, Clone)]
pub struct StoreRelation {
    store: TableStore,
    table: String,
    filters: Vec<FilterSpec>,
    loaded: Option<Vec<Row>>,
}

impl StoreRelation {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Realizes the relation: runs its query once and keeps the records
    pub fn load(&self) -> Result<StoreRelation> {
        let rows = self.store.execute(&self.table, &self.filters)?;
        Ok(StoreRelation {
            loaded: Some(rows),
            ..self.clone()
        })
    }

    fn fetch(&self) -> Result<Vec<Row>> {
        self.store.execute(&self.table, &self.filters)
    }
}

impl Relation for StoreRelation {
    type Error = Error;

    fn loaded(&self) -> Option<&[Row]> {
        self.loaded.as_deref()
    }

    /// Filtering always yields a fresh lazy relation, even from a loaded one
    fn filter(&self, spec: &FilterSpec) -> Result<Self> {
        let mut filters = self.filters.clone();
        filters.push(spec.clone());
        Ok(StoreRelation {
            store: self.store.clone(),
            table: self.table.clone(),
            filters,
            loaded: None,
        })
    }

    fn pluck(&self, columns: &[String]) -> Result<Vec<Row>> {
        Ok(predicate::pluck_all(&self.fetch()?, columns))
    }

    fn find_by(&self, spec: &FilterSpec) -> Result<Option<Row>> {
        Ok(self.filter(spec)?.fetch()?.into_iter().next())
    }

    fn exists(&self) -> Result<bool> {
        Ok(!self.fetch()?.is_empty())
    }

    fn take(&self) -> Result<Option<Row>> {
        Ok(self.fetch()?.into_iter().next())
    }

    fn find(&self, id: &Value) -> Result<Row> {
        predicate::find_by_id(&self.fetch()?, id)
    }

    /// `load` realizes the relation; the collection vocabulary (`first`,
    /// `count`, `to_a`, ...) runs the query and applies to its result.
    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Held<Self>> {
        match operation {
            "load" if args.is_empty() => Ok(Held::Relation(self.load()?)),
            _ => match &self.loaded {
                Some(rows) => invoke_on_rows(rows, operation, args),
                None => invoke_on_rows(&self.fetch()?, operation, args),
            },
        }
    }
}
