//! Desugar command implementation

use std::path::Path;

use anyhow::Result;
use pyfront_ast::{Node, python};
use pyfront_rewrite::{Desugarer, TempNames};

use crate::config::{DesugarConfig, FrontendConfig};

pub fn execute(input: &Path, config: &FrontendConfig) -> Result<()> {
    let tree = super::load_tree(input, config)?;
    let out = desugar(tree, &config.desugar)?;
    println!("{out}");
    Ok(())
}

/// Run the configured rules over a translated tree.
pub fn desugar(tree: Node, config: &DesugarConfig) -> Result<Node> {
    let registry = python::registry();
    let desugarer = match &config.rules {
        Some(rules) => Desugarer::with_rules(registry, rules)?,
        None => Desugarer::standard(registry),
    };
    let mut names = TempNames::new();

    if config.verify {
        return Ok(desugarer.run(tree, &mut names)?);
    }
    let mut out = desugarer.rewrite(tree, &mut names)?;
    out.finalize()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfront_ingest::translate_json;

    const ASSERT_MODULE: &str = r#"{"_type": "Module", "body": [
        {"_type": "Assert", "lineno": 1,
         "test": {"_type": "Name", "id": "ok", "ctx": {"_type": "Load"}}, "msg": null}
    ], "type_ignores": []}"#;

    #[test]
    fn test_standard_rules() {
        let tree = translate_json(ASSERT_MODULE).unwrap();
        let out = desugar(tree, &DesugarConfig::default()).unwrap();
        assert_eq!(
            out.to_string(),
            "Module(body=(If(test=UnaryOp(op=Not(), operand=Name(id='ok', ctx=Load())), \
             body=(Raise(exc=Call(func=Name(id='AssertionError', ctx=Load()), args=(), keywords=()), \
             cause=None),), orelse=()),), type_ignores=())"
        );
    }

    #[test]
    fn test_selected_rules_only() {
        let tree = translate_json(ASSERT_MODULE).unwrap();
        let config = DesugarConfig {
            rules: Some(vec!["for-loop".to_string()]),
            verify: true,
        };
        let out = desugar(tree, &config).unwrap();
        assert!(out.to_string().starts_with("Module(body=(Assert("));
    }

    #[test]
    fn test_unknown_rule() {
        let tree = translate_json(ASSERT_MODULE).unwrap();
        let config = DesugarConfig {
            rules: Some(vec!["loop-unroll".to_string()]),
            verify: false,
        };
        let err = desugar(tree, &config).unwrap_err();
        assert_eq!(err.to_string(), "unknown desugaring rule 'loop-unroll'");
    }
}
