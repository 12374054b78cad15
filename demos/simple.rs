//! Loading a TOML document, editing it as native values and dumping it back.
//!
//! Run with: cargo run --example simple

use std::error::Error;
use toml_native::{dumps, loads, Value};

const MANIFEST: &str = r#"
[package]
name = "demo"
version = "0.1.0"
released = 2024-03-01

[dependencies]
serde = "1.0"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = loads(MANIFEST)?;

    if let Some(package) = doc.get("package") {
        println!("package name: {:?}", package.get("name").and_then(Value::as_str));
        println!("released:     {:?}", package.get("released").and_then(Value::as_date));
    }

    if let Some(deps) = doc.get_mut("dependencies").and_then(Value::as_map_mut) {
        deps.insert("chrono".to_string(), Value::from("0.4"));
    }

    let text = dumps(&Value::Map(doc))?;
    println!("\nUpdated manifest:\n{}", text);

    // Broken input reports where parsing stopped
    let broken = "[library]\nname = \"x\"\nauthors = [\"unterminated";
    if let Err(e) = loads(broken) {
        println!("Rejected broken input: {}", e);
    }

    Ok(())
}
