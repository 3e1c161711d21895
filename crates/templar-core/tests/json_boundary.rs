use serde_json::json;

use templar_core::{Error, parse, stringify};

#[test]
fn parse_keeps_key_order() {
    let template = parse(r#"{"zeta|1-3": 1, "alpha": "x", "mid": [1, 2]}"#).expect("parse");
    let keys: Vec<&str> = template
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta|1-3", "alpha", "mid"]);
}

#[test]
fn parse_rejects_scalar_top_level() {
    let result = parse("42");
    assert!(matches!(result, Err(Error::InvalidTemplate(_))));
}

#[test]
fn parse_reports_malformed_json() {
    let result = parse("{\"a\": ");
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn stringify_is_compact() {
    let value = json!({"b": 1, "a": [true, null]});
    assert_eq!(stringify(&value).expect("stringify"), r#"{"b":1,"a":[true,null]}"#);
}
