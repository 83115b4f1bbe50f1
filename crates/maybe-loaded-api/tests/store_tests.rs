/// Tests for the store side: pushdown versus emulation, error propagation
/// and shipping loaded collections between processes
use maybe_loaded::{
    abstract_scope, Error, FilterSpec, Held, MaterializedProxy, QueryLimits, QueryProxy,
    Relation, Row, StoreRelation, TableStore, Value,
};
use std::fmt;
use std::thread;

fn seeded_store() -> TableStore {
    let store = TableStore::new();
    store
        .insert_many(
            "product_warehouses",
            (1..=6).map(|i| {
                Row::new()
                    .with("id", i)
                    .with("warehouse_id", i % 3)
                    .with("price_net", i * 5)
                    .with("stock_level", 10 - i)
            }),
        )
        .unwrap();
    store
}

#[test]
fn test_lazy_relation_pushes_down() {
    let store = seeded_store();
    let proxy = QueryProxy::from_relation(store.relation("product_warehouses"));

    let filtered = proxy
        .filter([("warehouse_id", 1)])
        .unwrap()
        .filter("price_net > 10")
        .unwrap();
    assert!(filtered.searches_store());
    assert_eq!(store.queries_executed(), 0);

    let relation = filtered.into_inner().into_relation().unwrap();
    assert_eq!(relation.filters().len(), 2);

    let plucked = QueryProxy::from_relation(relation).pluck(["id"]).unwrap();
    assert_eq!(store.queries_executed(), 1);
    assert!(!plucked.searches_store());

    let tuples = plucked.into_inner().into_rows().unwrap();
    assert_eq!(
        tuples.iter().map(|t| t.values.clone()).collect::<Vec<_>>(),
        vec![vec![Value::Integer(4)]]
    );
}

#[test]
fn test_preloaded_relation_never_hits_store() {
    let store = seeded_store();
    let loaded = store.relation("product_warehouses").load().unwrap();
    assert_eq!(store.queries_executed(), 1);

    let proxy = QueryProxy::from_relation(loaded);
    assert!(!proxy.searches_store());

    let exists = proxy.filter([("warehouse_id", 2)]).unwrap().exists().unwrap();
    assert_eq!(exists.held().as_flag(), Some(true));

    let found = proxy.find(3).unwrap().into_inner().into_row().unwrap();
    assert_eq!(found.get("price_net"), Some(&Value::Integer(15)));

    let plucked = proxy.pluck(["stock_level", "price_net"]).unwrap().take().unwrap();
    assert_eq!(
        plucked.into_inner().into_row().map(|t| t.values),
        Some(vec![Value::Integer(9), Value::Integer(5)])
    );

    let first = proxy.find_by("stock_level < 5").unwrap().into_inner().into_row();
    assert_eq!(first.and_then(|r| r.get("id").cloned()), Some(Value::Integer(6)));

    assert!(matches!(
        proxy.find(99),
        Err(Error::NotFound(Value::Integer(99)))
    ));

    assert_eq!(store.queries_executed(), 1);
}

#[test]
fn test_same_query_in_both_modes() {
    let store = seeded_store();
    let query = |held: Held<StoreRelation>| {
        abstract_scope(held, |pw: QueryProxy<StoreRelation>| {
            pw.filter([("warehouse_id", vec![0, 1])])?
                .filter("stock_level >= 5")?
                .pluck(["id", "stock_level"])?
                .call("to_a", &[])
        })
    };

    let lazy = query(Held::Relation(store.relation("product_warehouses")))
        .unwrap()
        .into_rows();
    let before = store.queries_executed();
    let preloaded = store.relation("product_warehouses").load().unwrap();
    let loaded = query(Held::Relation(preloaded)).unwrap().into_rows();

    assert_eq!(lazy, loaded);
    assert_eq!(lazy.map(|rows| rows.len()), Some(3));
    // only the load itself
    assert_eq!(store.queries_executed(), before + 1);
}

#[test]
fn test_store_shared_across_threads() {
    let store = seeded_store();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || {
                store
                    .insert("product_warehouses", Row::new().with("id", 100 + i))
                    .unwrap();
                QueryProxy::from_relation(store.relation("product_warehouses"))
                    .exists()
                    .unwrap()
                    .held()
                    .as_flag()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(true));
    }
    let count = QueryProxy::from_relation(store.relation("product_warehouses"))
        .call("count", &[])
        .unwrap()
        .into_inner();
    assert_eq!(count.into_value(), Some(Value::Integer(10)));
}

#[test]
fn test_limits_apply_to_lazy_relations() {
    let store = seeded_store();
    let limits = QueryLimits::default().with_max_conditions(1);
    let proxy = QueryProxy::with_limits(Held::Relation(store.relation("product_warehouses")), limits);

    let err = proxy
        .filter([("warehouse_id", 1), ("stock_level", 9)])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(store.queries_executed(), 0);
}

/// Remote store with its own error taxonomy
#[derive(Debug, Clone, PartialEq)]
enum RemoteError {
    Timeout,
    Query(Error),
}

impl From<Error> for RemoteError {
    fn from(err: Error) -> Self {
        RemoteError::Query(err)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Timeout => write!(f, "remote timed out"),
            RemoteError::Query(err) => write!(f, "{}", err),
        }
    }
}

#[derive(Debug, Clone)]
struct RemoteRelation {
    loaded: Option<Vec<Row>>,
}

impl Relation for RemoteRelation {
    type Error = RemoteError;

    fn loaded(&self) -> Option<&[Row]> {
        self.loaded.as_deref()
    }

    fn filter(&self, _spec: &FilterSpec) -> Result<Self, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn pluck(&self, _columns: &[String]) -> Result<Vec<Row>, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn find_by(&self, _spec: &FilterSpec) -> Result<Option<Row>, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn exists(&self) -> Result<bool, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn take(&self) -> Result<Option<Row>, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn find(&self, _id: &Value) -> Result<Row, RemoteError> {
        Err(RemoteError::Timeout)
    }

    fn invoke(&self, _operation: &str, _args: &[Value]) -> Result<Held<Self>, RemoteError> {
        Err(RemoteError::Timeout)
    }
}

#[test]
fn test_store_errors_propagate_unchanged() {
    let lazy = QueryProxy::from_relation(RemoteRelation { loaded: None });
    assert!(lazy.searches_store());
    assert_eq!(lazy.filter("price > 1").unwrap_err(), RemoteError::Timeout);
    assert_eq!(lazy.exists().unwrap_err(), RemoteError::Timeout);
    assert_eq!(lazy.call("reload", &[]).unwrap_err(), RemoteError::Timeout);
}

#[test]
fn test_core_errors_convert_into_store_error() {
    let loaded = QueryProxy::from_relation(RemoteRelation {
        loaded: Some(vec![Row::new().with("id", 1)]),
    });
    assert!(!loaded.searches_store());

    assert_eq!(
        loaded.find(99).unwrap_err(),
        RemoteError::Query(Error::NotFound(Value::Integer(99)))
    );
    assert!(matches!(
        loaded.filter("id >> 1").unwrap_err(),
        RemoteError::Query(Error::MalformedComparison(_))
    ));

    let found = loaded.find(1).unwrap().into_inner().into_row();
    assert_eq!(found, Some(Row::new().with("id", 1)));
}

#[test]
fn test_shipped_collection_queries_like_local() {
    let rows = vec![
        Row::new().with("id", 1).with("price", 5.5).with("sku", "A-1"),
        Row::new().with("id", 2).with("price", 15).with("sku", "B-2"),
    ];
    let spec = FilterSpec::from("price > 10");

    let bytes = bincode::serialize(&(rows.clone(), spec.clone())).unwrap();
    let (shipped, shipped_spec): (Vec<Row>, FilterSpec) = bincode::deserialize(&bytes).unwrap();

    let local = MaterializedProxy::new(rows).filter(&spec).unwrap().into_inner();
    let remote = MaterializedProxy::new(shipped)
        .filter(shipped_spec)
        .unwrap()
        .into_inner();
    assert_eq!(local, remote);
    assert_eq!(
        remote.into_rows().map(|r| r[0].get("sku").cloned()),
        Some(Some(Value::from("B-2")))
    );
}
