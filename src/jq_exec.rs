//! jq pre-processing of input documents.
use anyhow::{Context, Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, compile::Undefined, load};
use jaq_json::Val;

use crate::value::Value;

/// Runs `filter_src` over `input`; every filter output becomes one document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let json_input = serde_json::Value::from(input);
    let mut outputs = filter.run((Ctx::new([], &inputs), Val::from(json_input)));

    let mut out = Vec::new();
    while let Some(item) = outputs.next() {
        let v = item.map_err(|e| anyhow!("jq: {e:?}"))?;
        // Val only exposes JSON text, so round-trip through it.
        let json: serde_json::Value = serde_json::from_str(&v.to_string())
            .with_context(|| format!("jq produced non-JSON output `{v}`"))?;
        out.push(Value::from(json));
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}
