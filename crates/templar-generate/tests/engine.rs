use std::sync::Arc;
use std::thread;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

use templar_generate::{
    ExtensionRegistry, LocaleKey, MockEngine, MockOptions, MockRandom, PlaceholderRegistry,
};

fn seeded(seed: u64) -> MockEngine {
    MockEngine::builder()
        .random(MockRandom::from_rng(ChaCha8Rng::seed_from_u64(seed)))
        .build()
}

#[test]
fn plain_templates_round_trip() {
    let template = json!({
        "name": "Ana",
        "age": 31,
        "score": 4.5,
        "active": true,
        "tags": ["a", "b"],
        "nested": {"empty": {}, "list": [], "none": null}
    });
    assert_eq!(seeded(1).generate(&template), template);
}

#[test]
fn unknown_placeholder_is_kept() {
    let output = seeded(1).generate(&json!({"x": "@totallyMadeUp"}));
    assert_eq!(output, json!({"x": "@totallyMadeUp"}));
}

#[test]
fn users_with_sequential_ids() {
    let output = seeded(3).generate(&json!({
        "users|2": [{"id|+1": 1, "tag": "@word"}]
    }));
    let users = output["users"].as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 2);

    let ids: Vec<i64> = users.iter().filter_map(|user| user["id"].as_i64()).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1] - ids[0], 1);
    assert!(users.iter().all(|user| user["tag"].is_string()));
}

#[test]
fn counters_reset_between_calls() {
    let engine = seeded(5);
    let template = json!({"rows": [{"id|+1": 10}, {"id|+1": 10}]});
    let first = engine.generate(&template);
    let second = engine.generate(&template);
    assert_eq!(first, json!({"rows": [{"id": 10}, {"id": 11}]}));
    assert_eq!(first, second);
}

#[test]
fn same_name_at_different_depths_counts_separately() {
    let output = seeded(5).generate(&json!({
        "id|+1": 1,
        "child": {"id|+1": 50},
        "items": [{"id|+1": 7}, {"id|+1": 7}]
    }));
    assert_eq!(
        output,
        json!({"id": 1, "child": {"id": 50}, "items": [{"id": 7}, {"id": 8}]})
    );
}

#[test]
fn seeded_engines_are_reproducible() {
    let template = json!({
        "name": "@name",
        "age|18-60": 0,
        "code": "/[A-Z]{3}\\d{4}/",
        "tags|3": ["red", "green", "blue"],
        "ratio|0-1.2-4": 0
    });
    assert_eq!(seeded(99).generate(&template), seeded(99).generate(&template));
}

#[test]
fn options_drive_seed_and_locale() {
    let options = MockOptions {
        seed: Some(8),
        locale: LocaleKey::PtBr,
    };
    let left = MockEngine::from_options(&options);
    let right = MockEngine::from_options(&options);
    assert_eq!(left.random().locale(), LocaleKey::PtBr);

    let template = json!({"city": "@city", "n|1-1000": 0});
    assert_eq!(left.generate(&template), right.generate(&template));
}

#[test]
fn cross_references_resolve_resolved_siblings() {
    let output = seeded(2).generate(&json!({
        "first": "Ana",
        "count|4": 0,
        "copy": "@first",
        "typed": "@count",
        "sentence": "@first has @count",
        "user": {"name": "Bo"},
        "owner": "@user.name"
    }));
    assert_eq!(output["copy"], json!("Ana"));
    assert_eq!(output["typed"], json!(4));
    assert_eq!(output["sentence"], json!("Ana has 4"));
    assert_eq!(output["owner"], json!("Bo"));
}

#[test]
fn references_to_later_properties_stay_literal() {
    let output = seeded(2).generate(&json!({"early": "@late.value", "late": {"value": 1}}));
    assert_eq!(output["early"], json!("@late.value"));
}

#[test]
fn placeholders_keep_types_when_alone() {
    let output = seeded(4).generate(&json!({
        "n": "@integer(3, 3)",
        "b": "@boolean",
        "list": "@range(1, 3)",
        "text": "id-@integer(3, 3)"
    }));
    assert_eq!(output["n"], json!(3));
    assert!(output["b"].is_boolean());
    assert_eq!(output["list"], json!([1, 2, 3]));
    assert_eq!(output["text"], json!("id-3"));
}

#[test]
fn placeholders_are_case_insensitive() {
    let output = seeded(4).generate(&json!({"up": "@UPPER('abc')", "mixed": "@Lower('XY')"}));
    assert_eq!(output, json!({"up": "ABC", "mixed": "xy"}));
}

#[test]
fn bad_arity_stays_literal() {
    let output = seeded(4).generate(&json!({"x": "@email(1, 2, 3)"}));
    assert_eq!(output["x"], json!("@email(1, 2, 3)"));
}

#[test]
fn phone_type_tokens_select_prefixes() {
    let output = seeded(6).generate(&json!({"phone": "@phone(PT.TF)"}));
    let phone = output["phone"].as_str().unwrap_or_default().to_string();
    let prefix = phone.split('-').next().unwrap_or_default();
    assert!(["800", "888", "877", "866", "855", "844"].contains(&prefix), "{phone}");
}

#[test]
fn extensions_are_consulted_after_builtins() {
    let extensions = Arc::new(ExtensionRegistry::new());
    extensions.register("sku", || Ok(json!("SKU-1")));
    extensions.register("email", || Ok(json!("shadowed")));
    extensions.register_with_args("join", |args| {
        let parts: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect();
        Ok(json!(parts.join("-")))
    });
    extensions.register("fails", || Err("nope".to_string()));

    let engine = MockEngine::builder()
        .seed(1)
        .extensions(Arc::clone(&extensions))
        .build();
    let output = engine.generate(&json!({
        "sku": "@SKU",
        "email": "@email",
        "joined": "@join(a, 2, true)",
        "broken": "@fails"
    }));

    assert_eq!(output["sku"], json!("SKU-1"));
    assert_ne!(output["email"], json!("shadowed"));
    assert_eq!(output["joined"], json!("a-2-true"));
    assert_eq!(output["broken"], json!("@fails"));

    assert!(extensions.remove("sku"));
    let output = engine.generate(&json!({"sku": "@sku"}));
    assert_eq!(output["sku"], json!("@sku"));
}

#[test]
fn extensions_fill_arities_builtins_lack() {
    let engine = MockEngine::default();
    engine
        .extensions()
        .register_with_args("first", |args| Ok(json!(format!("first of {}", args.len()))));
    let output = engine.generate(&json!({"x": "@first(1, 2)"}));
    assert_eq!(output["x"], json!("first of 2"));
}

#[test]
fn custom_registry_and_coercers_are_injected() {
    let engine = MockEngine::builder()
        .seed(3)
        .placeholders(PlaceholderRegistry::empty())
        .without_coercers()
        .coercer(|token: &str| (token == "answer").then(|| json!(42)))
        .build();
    engine
        .extensions()
        .register_with_args("echo", |args| Ok(args.first().cloned().unwrap_or(Value::Null)));

    let output = engine.generate(&json!({"w": "@word", "e": "@echo(answer)"}));
    assert_eq!(output, json!({"w": "@word", "e": 42}));
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(MockEngine::builder().seed(12).build());
    engine
        .extensions()
        .register("tick", || Ok(json!("tock")));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..25)
                    .map(|_| {
                        engine.generate(&json!({
                            "rows": [{"id|+1": 1, "t": "@tick"}, {"id|+1": 1, "t": "@tick"}]
                        }))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let outputs = handle.join().expect("worker thread");
        for output in outputs {
            assert_eq!(
                output,
                json!({"rows": [{"id": 1, "t": "tock"}, {"id": 2, "t": "tock"}]})
            );
        }
    }
}

#[test]
fn generate_json_round_trips_text() {
    let engine = seeded(1);
    let text = engine
        .generate_json(r#"{"b": 1, "a|2": "x"}"#)
        .expect("generation");
    assert_eq!(text, r#"{"b":1,"a":"xx"}"#);
    assert!(engine.generate_json("42").is_err());
    assert!(engine.generate_json("{").is_err());
}
