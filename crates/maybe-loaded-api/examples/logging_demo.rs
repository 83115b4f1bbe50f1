use maybe_loaded::logging::LogConfig;
use maybe_loaded::{QueryProxy, Row, TableStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Debug level shows where every operation was executed
    let _guard = LogConfig::debug().init();

    println!("=== maybe-loaded Logging Demo ===\n");

    let store = TableStore::new();
    store.insert_many(
        "users",
        (1..=5).map(|i| Row::new().with("id", i).with("age", 20 + i * 3)),
    )?;

    println!("1. Lazy chain...");
    let lazy = QueryProxy::from_relation(store.relation("users"));
    let count = lazy.filter("age >= 26")?.call("count", &[])?;
    println!("   users aged 26+: {:?}", count.into_inner().into_value());

    println!("\n2. Same chain on loaded data...");
    let loaded = QueryProxy::from_relation(store.relation("users").load()?);
    let count = loaded.filter("age >= 26")?.call("count", &[])?;
    println!("   users aged 26+: {:?}", count.into_inner().into_value());

    println!("\n=== Demo Complete ===");
    println!("Check the logs above to see which mode ran each operation!");

    Ok(())
}
