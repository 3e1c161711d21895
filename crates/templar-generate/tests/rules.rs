use serde_json::{Value, json};

use templar_generate::MockEngine;

fn engine() -> MockEngine {
    MockEngine::builder().seed(42).build()
}

fn field(output: &Value, name: &str) -> Value {
    output.get(name).cloned().unwrap_or(Value::Null)
}

#[test]
fn string_count_repeats_text() {
    let output = engine().generate(&json!({"greeting|3": "Hi"}));
    assert_eq!(output, json!({"greeting": "HiHiHi"}));
}

#[test]
fn string_range_repeats_within_bounds() {
    let engine = engine();
    for _ in 0..20 {
        let output = engine.generate(&json!({"stars|1-4": "*"}));
        let stars = field(&output, "stars");
        let len = stars.as_str().map_or(0, str::len);
        assert!((1..=4).contains(&len), "{stars}");
    }
}

#[test]
fn number_range_stays_inside_bounds() {
    let engine = engine();
    for _ in 0..50 {
        let output = engine.generate(&json!({"age|18-65": 0}));
        let age = field(&output, "age").as_i64().unwrap_or(-1);
        assert!((18..=65).contains(&age));
    }
    let output = engine.generate(&json!({"fixed|7-7": 0, "count|9": 0}));
    assert_eq!(output, json!({"fixed": 7, "count": 9}));
}

#[test]
fn increment_counts_across_list_items() {
    let engine = engine();
    let output = engine.generate(&json!({
        "items": [{"id|+1": 100}, {"id|+1": 100}, {"id|+1": 100}]
    }));
    let ids: Vec<i64> = field(&output, "items")
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![100, 101, 102]);
}

#[test]
fn increment_with_custom_step() {
    let engine = engine();
    let output = engine.generate(&json!({
        "rows": [{"n|+5": 1}, {"n|+5": 1}, {"n|+5": 1}]
    }));
    assert_eq!(
        output,
        json!({"rows": [{"n": 1}, {"n": 6}, {"n": 11}]})
    );
}

#[test]
fn fixed_float_has_exact_digits() {
    let engine = engine();
    for _ in 0..30 {
        let output = engine.generate(&json!({"price|5.2": 0}));
        let price = field(&output, "price").as_f64().unwrap_or(-1.0);
        assert!((5.0..6.0).contains(&price), "{price}");
        let scaled = price * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{price}");
    }
}

#[test]
fn float_range_respects_both_parts() {
    let engine = engine();
    for _ in 0..30 {
        let output = engine.generate(&json!({"ratio|1-3.1-2": 0}));
        let ratio = field(&output, "ratio").as_f64().unwrap_or(-1.0);
        assert!((1.0..4.0).contains(&ratio), "{ratio}");
        let scaled = ratio * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{ratio}");
    }
}

#[test]
fn boolean_rules_yield_booleans() {
    let engine = engine();
    let output = engine.generate(&json!({"flag|1": false, "always|1-0": false, "never|0-1": true}));
    assert!(field(&output, "flag").is_boolean());
    assert_eq!(field(&output, "always"), json!(true));
    assert_eq!(field(&output, "never"), json!(false));
}

#[test]
fn boolean_counts_other_than_one_leave_the_value() {
    let output = engine().generate(&json!({"flag|3": true, "off|0": false}));
    assert_eq!(output, json!({"flag": true, "off": false}));
}

#[test]
fn weighted_boolean_follows_its_ratio() {
    let engine = engine();
    let draws = 400;
    let hits = (0..draws)
        .filter(|_| {
            let output = engine.generate(&json!({"flag|3-1": false}));
            field(&output, "flag") == json!(true)
        })
        .count();
    let ratio = hits as f64 / draws as f64;
    assert!((0.65..=0.85).contains(&ratio), "ratio {ratio}");
}

#[test]
fn object_count_keeps_exactly_n_source_keys() {
    let engine = engine();
    let source = json!({"a": 1, "b": 2, "c": 3, "d": 4, "e": 5});
    for _ in 0..20 {
        let output = engine.generate(&json!({"pick|2": source.clone()}));
        let picked = field(&output, "pick");
        let picked = picked.as_object().cloned().unwrap_or_default();
        assert_eq!(picked.len(), 2);
        for (key, value) in &picked {
            assert_eq!(source.get(key), Some(value));
        }
    }
}

#[test]
fn object_range_clamps_to_available_keys() {
    let output = engine().generate(&json!({"pick|5-9": {"a": 1, "b": 2}}));
    assert_eq!(output, json!({"pick": {"a": 1, "b": 2}}));
}

#[test]
fn object_selection_honours_nested_rules() {
    let output = engine().generate(&json!({"pick|1": {"inner|3": "ab"}}));
    assert_eq!(output, json!({"pick": {"inner": "ababab"}}));
}

#[test]
fn pick_one_collapses_to_an_element() {
    let engine = engine();
    let options = [json!("a"), json!("b"), json!("c")];
    for _ in 0..20 {
        let output = engine.generate(&json!({"letter|1": ["a", "b", "c"]}));
        let letter = field(&output, "letter");
        assert!(!letter.is_array());
        assert!(options.contains(&letter));
    }
}

#[test]
fn pick_sequential_walks_in_order() {
    let engine = engine();
    let output = engine.generate(&json!({
        "rows": [
            {"day|+1": ["mon", "tue"]},
            {"day|+1": ["mon", "tue"]},
            {"day|+1": ["mon", "tue"]}
        ]
    }));
    assert_eq!(
        output,
        json!({"rows": [{"day": "mon"}, {"day": "tue"}, {"day": "mon"}]})
    );
}

#[test]
fn array_repeat_builds_independent_picks() {
    let engine = engine();
    let output = engine.generate(&json!({"tags|4": ["x", "y"], "more|2-3": ["z"]}));
    let tags = field(&output, "tags");
    let tags = tags.as_array().cloned().unwrap_or_default();
    assert_eq!(tags.len(), 4);
    assert!(tags.iter().all(|tag| tag == "x" || tag == "y"));

    let more = field(&output, "more");
    let len = more.as_array().map_or(0, Vec::len);
    assert!((2..=3).contains(&len));
}

#[test]
fn invalid_rules_generate_plainly() {
    let output = engine().generate(&json!({
        "inverted|9-1": "x",
        "places|1.11": 2,
        "weights|0-0": true
    }));
    assert_eq!(output, json!({"inverted": "x", "places": 2, "weights": true}));
}

#[test]
fn malformed_rule_text_keeps_the_name() {
    let output = engine().generate(&json!({"odd|abc": "v", "|3": "w", "tail|": "z"}));
    assert_eq!(output, json!({"odd": "v", "|3": "w", "tail|": "z"}));
}

#[test]
fn null_values_keep_stripped_name() {
    let output = engine().generate(&json!({"gone|1-3": null}));
    assert_eq!(output, json!({"gone": null}));
}

#[test]
fn oversized_repeat_counts_generate_without_the_rule() {
    let output = engine().generate(&json!({
        "s|9223372036854775807": "ab",
        "r|0-9223372036854775807": "ab",
        "a|9223372036854775807": [1],
        "b|1-9223372036854775807": [1, 2]
    }));
    assert_eq!(output, json!({"s": "ab", "r": "ab", "a": [1], "b": [1, 2]}));
}

#[test]
fn oversized_placeholder_lengths_stay_literal() {
    let template = json!({
        "text": "@string(9223372036854775807)",
        "list": "@range(0, 9223372036854775807)",
        "words": "@sentence(0, 9223372036854775807)",
        "title": "@title(1, 9223372036854775807)"
    });
    assert_eq!(engine().generate(&template), template);
}
