use maybe_loaded::{abstract_scope, Held, QueryProxy, Row, StoreRelation, TableStore};

/// Stock level and price of the first priced entry in `warehouse_id`,
/// whether or not the association was preloaded.
fn stock_and_price(
    product_warehouses: StoreRelation,
    warehouse_id: i64,
) -> maybe_loaded::Result<Option<Row>> {
    let held = abstract_scope(
        Held::Relation(product_warehouses),
        |pw: QueryProxy<StoreRelation>| {
            pw.filter([("warehouse_id", warehouse_id)])?
                .filter("price_net > 0")?
                .pluck(["stock_level", "price_net"])?
                .take()
        },
    )?;
    Ok(held.into_row())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== maybe-loaded Scope Demo ===\n");

    let store = TableStore::new();
    store.insert_many(
        "product_warehouses",
        vec![
            Row::new()
                .with("id", 1)
                .with("warehouse_id", 1)
                .with("price_net", 0)
                .with("stock_level", 12),
            Row::new()
                .with("id", 2)
                .with("warehouse_id", 1)
                .with("price_net", 19.9)
                .with("stock_level", 3),
            Row::new()
                .with("id", 3)
                .with("warehouse_id", 2)
                .with("price_net", 17.5)
                .with("stock_level", 40),
        ],
    )?;

    println!("1. Lazy relation (query runs in the store)...");
    let lazy = stock_and_price(store.relation("product_warehouses"), 1)?;
    println!("   result: {:?}", lazy.map(|t| t.to_string()));
    println!("   store queries so far: {}", store.queries_executed());

    println!("\n2. Preloaded relation (query emulated in memory)...");
    let preloaded = store.relation("product_warehouses").load()?;
    let before = store.queries_executed();
    let loaded = stock_and_price(preloaded.clone(), 1)?;
    println!("   result: {:?}", loaded.map(|t| t.to_string()));
    println!(
        "   store queries for the query itself: {}",
        store.queries_executed() - before
    );

    println!("\n3. find on preloaded data...");
    match QueryProxy::from_relation(preloaded).find(42) {
        Ok(found) => println!("   found: {:?}", found.into_inner().into_row()),
        Err(e) => println!("   error: {}", e),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
