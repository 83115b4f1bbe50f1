/// Dual-mode query proxy
///
/// Wraps a [`Held`] value and decides, once, whether recognized query
/// operations go to the store or are emulated in memory. Every operation
/// returns a new proxy; a proxy is never mutated, so one proxy can seed any
/// number of independent chains.
use crate::held::{invoke_on_record, invoke_on_rows, Held};
use crate::mode::{MaterializedMode, Queryable, StoreMode};
use crate::relation::{Detached, Relation};
use maybe_loaded_core::{Error, FilterSpec, QueryLimits, Value};
use std::fmt;
use tracing::{debug, trace};

/// Proxy over a relation or over already-loaded data
pub struct QueryProxy<H: Relation> {
    held: Held<H>,
    search_in_store: bool,
    limits: QueryLimits,
}

/// Proxy for scopes that only ever see materialized data
pub type MaterializedProxy = QueryProxy<Detached>;

impl<H: Relation> QueryProxy<H> {
    /// Wraps `held` with no limits on operation arguments
    pub fn new(held: impl Into<Held<H>>) -> Self {
        Self::with_limits(held, QueryLimits::default())
    }

    /// Wraps `held`, checking the arguments of every recognized operation
    /// in the chain against `limits`
    pub fn with_limits(held: impl Into<Held<H>>, limits: QueryLimits) -> Self {
        let held = held.into();
        let search_in_store = matches!(&held, Held::Relation(relation) if relation.is_unrealized());
        trace!(held = held.kind(), search_in_store, "wrapping value in query proxy");
        Self {
            held,
            search_in_store,
            limits,
        }
    }

    /// Wraps a store relation
    pub fn from_relation(relation: H) -> Self {
        Self::new(Held::Relation(relation))
    }

    /// Whether recognized operations are forwarded to the store
    pub fn searches_store(&self) -> bool {
        self.search_in_store
    }

    /// The wrapped value
    pub fn held(&self) -> &Held<H> {
        &self.held
    }

    /// Limits applied to every operation of the chain
    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Unwraps the proxy
    pub fn into_inner(self) -> Held<H> {
        self.held
    }

    /// Runs `f` on the held value and wraps whatever it returns in a new
    /// proxy with the same limits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maybe_loaded::{Held, MaterializedProxy, Row};
    ///
    /// let proxy = MaterializedProxy::new(vec![Row::new().with("id", 1)]);
    /// let doubled = proxy.apply_raw(|held| {
    ///     let rows = held.clone().into_rows().unwrap_or_default();
    ///     Ok(Held::Rows(rows.iter().chain(&rows).cloned().collect()))
    /// })?;
    /// assert_eq!(doubled.into_inner().into_rows().map(|r| r.len()), Some(2));
    /// # Ok::<(), maybe_loaded::Error>(())
    /// ```
    pub fn apply_raw<F>(&self, f: F) -> Result<Self, H::Error>
    where
        F: FnOnce(&Held<H>) -> Result<Held<H>, H::Error>,
    {
        f(&self.held).map(|held| Self::with_limits(held, self.limits))
    }

    fn dispatch<F>(&self, operation: &'static str, f: F) -> Result<Self, H::Error>
    where
        F: FnOnce(&dyn Queryable<H>) -> Result<Held<H>, H::Error>,
    {
        let search_in_store = self.search_in_store;
        self.apply_raw(|held| {
            let unsupported = |held: &'static str| Error::UnsupportedTarget {
                operation: operation.to_string(),
                held,
            };
            let mode: Box<dyn Queryable<H> + '_> = match held {
                Held::Relation(relation) if search_in_store => Box::new(StoreMode::new(relation)),
                Held::Relation(relation) => match relation.loaded() {
                    Some(rows) => Box::new(MaterializedMode::new(rows)),
                    None => return Err(unsupported("unloaded relation").into()),
                },
                Held::Rows(rows) => Box::new(MaterializedMode::new(rows)),
                other => return Err(unsupported(other.kind()).into()),
            };
            debug!(operation, mode = %mode.mode(), "dispatching query operation");
            f(mode.as_ref())
        })
    }

    /// `where`: records matching `spec`
    ///
    /// Accepts an attribute map (`[("warehouse_id", 3)]`, membership with a
    /// list value) or a comparison string (`"price_net > 0"`).
    pub fn filter(&self, spec: impl Into<FilterSpec>) -> Result<Self, H::Error> {
        let spec = spec.into();
        self.limits.validate_spec(&spec)?;
        self.dispatch("where", |mode| mode.filter(&spec))
    }

    /// `pluck`: one tuple row per record with `columns` in order
    pub fn pluck<I, S>(&self, columns: I) -> Result<Self, H::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.limits.validate_columns(&columns)?;
        self.dispatch("pluck", |mode| mode.pluck(&columns))
    }

    /// `find_by`: first record matching `spec`, or an absent record
    pub fn find_by(&self, spec: impl Into<FilterSpec>) -> Result<Self, H::Error> {
        let spec = spec.into();
        self.limits.validate_spec(&spec)?;
        self.dispatch("find_by", |mode| mode.find_by(&spec))
    }

    /// `exists?`
    pub fn exists(&self) -> Result<Self, H::Error> {
        self.dispatch("exists?", |mode| mode.exists())
    }

    /// `take`: first element, or an absent record
    pub fn take(&self) -> Result<Self, H::Error> {
        self.dispatch("take", |mode| mode.take())
    }

    /// `find`: the record with the given id
    ///
    /// # Errors
    ///
    /// On loaded data, `Error::NotFound` carrying `id`; on a lazy relation,
    /// whatever the store reports.
    pub fn find(&self, id: impl Into<Value>) -> Result<Self, H::Error> {
        let id = id.into();
        self.dispatch("find", |mode| mode.find(&id))
    }

    /// Forwards any other operation to the held value and wraps the result.
    ///
    /// Relations interpret `operation` themselves; loaded collections know
    /// `first`, `last`, `count`, `size`, `length`, `all`, `to_a`, `load`,
    /// `reverse`, `empty?`, `is_empty` and `any?`; a single record returns the
    /// attribute named `operation`.
    pub fn call(&self, operation: &str, args: &[Value]) -> Result<Self, H::Error> {
        debug!(operation, held = self.held.kind(), "forwarding pass-through operation");
        self.apply_raw(|held| match held {
            Held::Relation(relation) => relation.invoke(operation, args),
            Held::Rows(rows) => Ok(invoke_on_rows(rows, operation, args)?),
            Held::Row(Some(record)) => Ok(invoke_on_record(record, operation, args)?),
            _ => Err(Error::UnknownOperation(format!("{} on {}", operation, held.kind())).into()),
        })
    }
}

impl<H: Relation + Clone> Clone for QueryProxy<H> {
    fn clone(&self) -> Self {
        Self {
            held: self.held.clone(),
            search_in_store: self.search_in_store,
            limits: self.limits,
        }
    }
}

impl<H: Relation + fmt::Debug> fmt::Debug for QueryProxy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryProxy")
            .field("held", &self.held)
            .field("search_in_store", &self.search_in_store)
            .finish()
    }
}
