//! Building values at runtime, converting structs and profiling conversions.
//!
//! Run with: cargo run --example dynamic_values

use serde::Serialize;
use std::error::Error;
use toml_native::profile::Stats;
use toml_native::{dumps, dumps_with, loads_with, to_value, value, Options, Value};

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
    quota: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with value! macro
    let config = value!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Config as TOML:\n{}", dumps(&config)?);

    if let Some(port) = config.get("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}\n", port);
    }

    // Convert an existing struct to Value
    let mut user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
        quota: 10_000,
    };
    println!("User as TOML:\n{}", dumps(&to_value(&user)?)?);

    // Integers past i64 have no TOML form and are rejected with their location
    user.quota = u64::MAX;
    match dumps(&to_value(&user)?) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {}\n", e),
    }

    // Time each phase across repeated calls
    let mut stats = Stats::new();
    let options = Options::new();
    for _ in 0..100 {
        let doc = loads_with("a = 1\n[b]\nc = [1, 2, 3]", &options, &mut stats)?;
        dumps_with(&Value::Map(doc), &options, &mut stats)?;
    }
    print!("{}", stats);

    Ok(())
}
