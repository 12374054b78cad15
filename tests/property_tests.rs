//! Property-based tests for the decode/encode round trip.
//!
//! Generated native documents are dumped to TOML text and loaded back;
//! the result must equal the input. Floats exclude NaN, which never
//! compares equal, and strings stay printable so failures are readable.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use toml_native::{dumps, from_str, loads, to_string, Calendar, Datetime, Map, Value};

fn roundtrip(doc: &Map) -> bool {
    match dumps(&Value::Map(doc.clone())) {
        Ok(text) => match loads(&text) {
            Ok(back) => {
                if back != *doc {
                    eprintln!("Mismatch after reload of:\n{}", text);
                }
                back == *doc
            }
            Err(e) => {
                eprintln!("Load failed: {}", e);
                eprintln!("Dumped text was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Dump failed: {}", e);
            false
        }
    }
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z][a-z0-9_]{0,8}", "[ -~]{0,6}"]
}

fn arb_calendar() -> impl Strategy<Value = Calendar> {
    let date = (0i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
    let time = (0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000)
        .prop_map(|(h, m, s, us)| NaiveTime::from_hms_micro_opt(h, m, s, us).unwrap());
    let offset = (-(23 * 60)..=(23 * 60)).prop_map(|minutes: i32| {
        FixedOffset::east_opt(minutes * 60).unwrap()
    });
    prop_oneof![
        date.clone().prop_map(Calendar::Date),
        time.clone().prop_map(Calendar::Time),
        (date.clone(), time.clone())
            .prop_map(|(d, t)| Calendar::DateTime(Datetime::local(d.and_time(t)))),
        (date, time, offset)
            .prop_map(|(d, t, o)| Calendar::DateTime(Datetime::with_offset(d.and_time(t), o))),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>()
            .prop_filter("NaN never round-trips by equality", |f| !f.is_nan())
            .prop_map(Value::Float),
        "[ -~]{0,16}".prop_map(Value::String),
        arb_calendar().prop_map(Value::Calendar),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Seq),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
        ]
    })
}

fn arb_document() -> impl Strategy<Value = Map> {
    prop::collection::vec((arb_key(), arb_value()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Service {
    name: String,
    port: u16,
    weight: f64,
    tags: Vec<String>,
    enabled: bool,
}

proptest! {
    #[test]
    fn prop_document_roundtrip(doc in arb_document()) {
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_integers_stay_integers(n in any::<i64>()) {
        let mut doc = Map::new();
        doc.insert("n".to_string(), Value::Integer(n));
        let back = loads(&dumps(&Value::Map(doc)).unwrap()).unwrap();
        prop_assert_eq!(back.get("n"), Some(&Value::Integer(n)));
    }

    #[test]
    fn prop_whole_floats_stay_floats(n in -1_000_000i32..1_000_000) {
        let mut doc = Map::new();
        doc.insert("f".to_string(), Value::Float(f64::from(n)));
        let back = loads(&dumps(&Value::Map(doc)).unwrap()).unwrap();
        prop_assert_eq!(back.get("f"), Some(&Value::Float(f64::from(n))));
    }

    #[test]
    fn prop_struct_roundtrip(
        name in "[a-z]{1,10}",
        port in any::<u16>(),
        weight in -1.0e6f64..1.0e6,
        tags in prop::collection::vec("[a-z]{0,5}", 0..4),
        enabled in any::<bool>(),
    ) {
        let service = Service { name, port, weight, tags, enabled };
        let text = to_string(&service).unwrap();
        let back: Service = from_str(&text).unwrap();
        prop_assert_eq!(back, service);
    }

    #[test]
    fn prop_garbage_never_panics(text in "\\PC{0,64}") {
        let _ = loads(&text);
    }
}
