//! Runs a handful of realistic, loosely written feature documents through the codec
//! and prints what comes out. `RUST_LOG=debug` shows schema construction.
use serde_json::json;
use worldgen_codec::codec::FieldCodec;
use worldgen_codec::types::{BlockPredicate, BlockStateProvider, HeightProvider, NumericProvider};
use worldgen_codec::{CollectingSink, DecodeError, Dispatch, Document, Layout, SchemaBuilder, Value};

/// A typed feature config, decoded through a schema rather than by hand.
#[derive(Debug, Clone, PartialEq)]
struct Spire {
    height: NumericProvider,
    y: HeightProvider,
    block: BlockStateProvider,
    target: BlockPredicate,
}

fn spire_dispatch() -> Dispatch<Spire> {
    let mut builder = SchemaBuilder::new("spire");
    builder
        .add("height", FieldCodec::numeric_provider())
        .add("y", FieldCodec::height_provider())
        .add("block", FieldCodec::block_state_provider())
        .add("target", FieldCodec::block_predicate());
    let schema = builder.build(
        |doc: Document| -> Result<Spire, DecodeError> {
            Ok(Spire {
                height: doc.require("spire", "height")?,
                y: doc.require("spire", "y")?,
                block: doc.require("spire", "block")?,
                target: doc.require("spire", "target")?,
            })
        },
        |spire: &Spire| {
            Document::new()
                .with("height", spire.height.clone())
                .with("y", spire.y.clone())
                .with("block", spire.block.clone())
                .with("target", spire.target.clone())
        },
    );
    let mut dispatch = Dispatch::new(Layout::config());
    dispatch.register("mymod:spire", schema);
    dispatch
}

fn realistic_samples() -> Vec<serde_json::Value> {
    vec![
        // canonical form
        json!({
            "type": "mymod:spire",
            "config": {
                "height": {"type": "uniform", "min_inclusive": 4, "max_inclusive": 9},
                "y": {"type": "uniform", "min_inclusive": {"above_bottom": 8}, "max_inclusive": {"absolute": 64}},
                "block": {"type": "simple_state_provider", "state": {"Name": "minecraft:stone"}},
                "target": {"type": "matching_blocks", "blocks": ["minecraft:grass_block"]}
            }
        }),
        // shorthand everywhere
        json!({
            "type": "spire",
            "config": {
                "height": [4, 9],
                "y": ["bottom", 64],
                "block": "stone",
                "target": ["grass_block", "dirt"]
            }
        }),
        // synonyms and weighted shorthand
        json!({
            "type": "mymod:spire",
            "config": {
                "height": {"Min": 2, "Max": 2},
                "y": {"type": "trapezoid", "min": -16, "max": 48, "plateau": 8},
                "block": [{"state": "andesite", "weight": 3}, "diorite"],
                "target": {"type": "not", "predicate": "replaceable"}
            }
        }),
        // malformed values fall back with diagnostics
        json!({
            "type": "mymod:spire",
            "config": {
                "height": {"type": "uniform", "value": {}},
                "y": 12,
                "block": {"type": "weighted_state_provider", "entries": []},
                "target": {"type": "bogus"}
            }
        }),
        // structural failure
        json!({"type": "mymod:spire", "config": {"height": 3}}),
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let dispatch = spire_dispatch();
    for (index, sample) in realistic_samples().into_iter().enumerate() {
        let sink = CollectingSink::new();
        let input = Value::from(sample);
        eprintln!("—— sample {index} ——");
        match dispatch.decode_with(&input, &sink) {
            Ok(tagged) => {
                eprintln!("✅ {:?}", tagged.value);
                match dispatch.encode(&tagged) {
                    Ok(encoded) => println!("{encoded}"),
                    Err(error) => eprintln!("❌ encode failed: {error}"),
                }
            }
            Err(error) => eprintln!("❌ {error}"),
        }
        for diagnostic in sink.take() {
            eprintln!("⚠️  {diagnostic}");
        }
    }
}
