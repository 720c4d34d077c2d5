//! Schema command implementation

use anyhow::Result;
use pyfront_ast::python;

pub fn execute(kind: Option<&str>) -> Result<()> {
    for line in describe(kind)? {
        println!("{line}");
    }
    Ok(())
}

/// One line per schema: the named kind, or every registered kind.
fn describe(kind: Option<&str>) -> Result<Vec<String>> {
    let registry = python::registry();
    match kind {
        Some(kind) => Ok(vec![registry.get(kind)?.to_string()]),
        None => Ok(registry.schemas().map(|s| s.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_kind() {
        assert_eq!(
            describe(Some("Return")).unwrap(),
            vec!["Return <: stmt (expr? value)"]
        );
    }

    #[test]
    fn test_all_kinds() {
        let lines = describe(None).unwrap();
        assert_eq!(lines.len(), python::registry().len());
        assert_eq!(lines[0], "AST");
    }

    #[test]
    fn test_unknown_kind() {
        assert!(describe(Some("Frobnicate")).is_err());
    }
}
