use serde_json::json;
use worldgen_codec::codec::FieldCodec;
use worldgen_codec::manifest::Manifest;
use worldgen_codec::types::{
    BlockPredicate, BlockState, BlockStateProvider, HeightProvider, NoiseParameters,
    NumericProvider, VerticalAnchor,
};
use worldgen_codec::{Coercer, Coercible, CollectingSink, DecodeError, Document, SchemaBuilder, Value};

fn coerce<T: Coercible>(v: serde_json::Value) -> (T, CollectingSink) {
    let sink = CollectingSink::new();
    let out = Coercer::new(&sink).coerce_value(&Value::from(v));
    (out, sink)
}

#[test]
fn constant_shorthands_agree() {
    let forms = [json!(5), json!({"value": 5}), json!([5, 5]), json!([5]), json!("5")];
    for form in forms {
        let (x, sink) = coerce::<NumericProvider>(form.clone());
        assert_eq!(x, NumericProvider::Constant(5.0), "{form}");
        assert!(sink.is_empty(), "{form}");
    }
}

#[test]
fn range_key_synonyms_agree() {
    let expected = NumericProvider::Uniform { min: 1.0, max: 4.0 };
    let forms = [
        json!({"min": 1, "max": 4}),
        json!({"Min": 1, "Max": 4}),
        json!({"min_inclusive": 1, "max_inclusive": 4}),
        json!({"minInclusive": 1, "maxInclusive": 4}),
        json!({"type": "uniform", "min": 1, "max": 4}),
        json!({"type": "uniform", "value": {"min": 1, "max": 4}}),
        json!([1, 4]),
    ];
    for form in forms {
        assert_eq!(coerce::<NumericProvider>(form.clone()).0, expected, "{form}");
    }
}

#[test]
fn height_shorthands() {
    let (h, _) = coerce::<HeightProvider>(json!(["bottom", 64]));
    assert_eq!(
        h,
        HeightProvider::Uniform {
            min: VerticalAnchor::BOTTOM,
            max: VerticalAnchor::Absolute(64),
        }
    );
    let (h, _) = coerce::<HeightProvider>(json!(12));
    assert_eq!(h, HeightProvider::Constant(VerticalAnchor::Absolute(12)));
    let (h, _) = coerce::<HeightProvider>(json!([{"above_bottom": 8}, {"above_bottom": 8}]));
    assert_eq!(h, HeightProvider::Constant(VerticalAnchor::AboveBottom(8)));
}

#[test]
fn unknown_predicate_type_is_always_false_without_a_diagnostic() {
    let (p, sink) = coerce::<BlockPredicate>(json!({"type": "bogus"}));
    assert_eq!(p, BlockPredicate::always_false());
    assert!(sink.is_empty());
}

#[test]
fn malformed_documents_report_type_and_input() {
    let (p, sink) = coerce::<BlockPredicate>(json!({"type": "not"}));
    assert_eq!(p, BlockPredicate::default());
    let diagnostics = sink.take();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, "block predicate");
    assert_eq!(diagnostics[0].input, Value::from(json!({"type": "not"})));
    assert!(diagnostics[0].to_string().contains("block predicate"));
}

#[test]
fn null_is_the_default_silently() {
    let (s, sink) = coerce::<BlockStateProvider>(json!(null));
    assert_eq!(s, BlockStateProvider::Simple(BlockState::air()));
    assert!(sink.is_empty());
    let (n, _) = coerce::<NoiseParameters>(json!(null));
    assert_eq!(n, NoiseParameters::default());
}

#[test]
fn state_provider_shorthands() {
    let (s, _) = coerce::<BlockStateProvider>(json!("oak_log[axis=y]"));
    let BlockStateProvider::Simple(state) = s else {
        panic!("expected a simple provider");
    };
    assert_eq!(state.to_string(), "minecraft:oak_log[axis=y]");

    let (s, _) = coerce::<BlockStateProvider>(json!(["stone", {"state": "granite", "weight": 3}]));
    let BlockStateProvider::Weighted(entries) = s else {
        panic!("expected a weighted provider");
    };
    let weights: Vec<i32> = entries.iter().map(|e| e.weight).collect();
    assert_eq!(weights, [1, 3]);
}

#[test]
fn schemas_mix_strict_and_soft_fields() {
    let mut builder = SchemaBuilder::new("ore");
    builder
        .add("size", FieldCodec::int_range(0, 64))
        .add("discard_chance_on_air_exposure", FieldCodec::float_range(0.0, 1.0))
        .add("targets", FieldCodec::block_predicate());
    let schema = builder.build_document();

    let sink = CollectingSink::new();
    let input = Value::from(json!({
        "size": 9,
        "discard_chance_on_air_exposure": 0.5,
        "targets": {"type": "all_of"}
    }));
    let doc: Document = schema.decode_with(&input, &sink).unwrap();
    assert_eq!(doc.get_as::<i32>("size"), Some(9));
    assert_eq!(sink.len(), 1);

    let err = schema
        .decode(&Value::from(json!({"size": 65, "discard_chance_on_air_exposure": 0, "targets": true})))
        .unwrap_err();
    assert_eq!(err.field(), Some("size"));
    assert!(matches!(err, DecodeError::Field { .. }));
}

#[test]
fn manifest_schemas_decode_loose_input() {
    let manifest = Manifest::from_json(
        r#"{"layout": "inline", "features": [{"type": "mymod:pillar", "fields": [
            {"name": "height", "codec": {"ranged_numeric_provider": [1, 32]}},
            {"name": "block", "codec": "block_state_provider"},
            {"name": "base", "codec": {"xor": ["block_state", "block_predicate"]}, "required": false}
        ]}]}"#,
    )
    .unwrap();
    let dispatch = manifest.dispatch().unwrap();
    let tagged = dispatch
        .decode(&Value::from(json!({"type": "mymod:pillar", "height": [3, 7], "block": "basalt"})))
        .unwrap();
    assert_eq!(
        tagged.value.get_as::<NumericProvider>("height"),
        Some(NumericProvider::Uniform { min: 3.0, max: 7.0 })
    );
    assert_eq!(
        dispatch.encode(&tagged).unwrap().to_string(),
        r#"{"type":"mymod:pillar","height":{"type":"uniform","value":{"min":3,"max":7}},"block":{"type":"simple_state_provider","state":{"Name":"minecraft:basalt"}}}"#
    );
}
