//! Scope entry and unwrap protocol
//!
//! [`abstract_scope`] wraps a value in a [`QueryProxy`], hands the proxy to
//! the caller's function and unwraps whatever comes back: a proxy becomes
//! the value it holds, any plain value is returned as is.

use crate::held::Held;
use crate::proxy::QueryProxy;
use crate::relation::Relation;
use maybe_loaded_core::{QueryLimits, Row, Value};

/// Result of a scope function that can be turned back into a plain value
pub trait ScopeResult {
    /// The plain value
    type Output;

    /// Strips the proxy, if any
    fn unwrap_scope(self) -> Self::Output;
}

impl<H: Relation> ScopeResult for QueryProxy<H> {
    type Output = Held<H>;

    fn unwrap_scope(self) -> Held<H> {
        self.into_inner()
    }
}

impl<H> ScopeResult for Held<H> {
    type Output = Self;

    fn unwrap_scope(self) -> Self {
        self
    }
}

macro_rules! plain_scope_result {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScopeResult for $ty {
                type Output = Self;

                fn unwrap_scope(self) -> Self {
                    self
                }
            }
        )*
    };
}

plain_scope_result!(
    (),
    bool,
    i64,
    u64,
    usize,
    f64,
    String,
    Value,
    Row,
    Vec<Row>,
    Vec<Value>,
    Option<Row>,
    Option<Value>,
);

/// Runs `f` against a proxy over `initial` and unwraps its result.
///
/// # Examples
///
/// ```rust
/// use maybe_loaded::{abstract_scope, MaterializedProxy, Row, Value};
///
/// let rows = vec![
///     Row::new().with("id", 1).with("price", 5),
///     Row::new().with("id", 2).with("price", 15),
/// ];
///
/// let held = abstract_scope(rows, |p: MaterializedProxy| {
///     p.filter("price > 10")?.pluck(["id"])?.take()
/// })?;
/// assert_eq!(held.into_row().map(|t| t.values), Some(vec![Value::Integer(2)]));
/// # Ok::<(), maybe_loaded::Error>(())
/// ```
pub fn abstract_scope<H, T, F>(initial: impl Into<Held<H>>, f: F) -> Result<T::Output, H::Error>
where
    H: Relation,
    T: ScopeResult,
    F: FnOnce(QueryProxy<H>) -> Result<T, H::Error>,
{
    abstract_scope_with(QueryLimits::default(), initial, f)
}

/// [`abstract_scope`] with explicit limits for every operation in the chain
pub fn abstract_scope_with<H, T, F>(
    limits: QueryLimits,
    initial: impl Into<Held<H>>,
    f: F,
) -> Result<T::Output, H::Error>
where
    H: Relation,
    T: ScopeResult,
    F: FnOnce(QueryProxy<H>) -> Result<T, H::Error>,
{
    let proxy = QueryProxy::with_limits(initial, limits);
    f(proxy).map(ScopeResult::unwrap_scope)
}
