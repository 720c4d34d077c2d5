//! Check command implementation

use std::path::Path;

use anyhow::Result;
use pyfront_ast::{Node, Visitor};

use crate::config::FrontendConfig;

pub fn execute(input: &Path, config: &FrontendConfig) -> Result<()> {
    let tree = super::load_tree(input, config)?;
    let count = count_nodes(&tree);
    tracing::info!(nodes = count, "Translation succeeded");
    println!("{}: ok ({count} nodes)", input.display());
    Ok(())
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
}

impl Visitor for NodeCounter {
    fn visit(&mut self, node: &Node) {
        self.count += 1;
        self.generic_visit(node);
    }
}

fn count_nodes(tree: &Node) -> usize {
    let mut counter = NodeCounter::default();
    counter.visit(tree);
    counter.count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfront_ingest::translate_json;

    #[test]
    fn test_count_nodes() {
        // Module, Expr, Name, Load
        let tree = translate_json(
            r#"{"_type": "Module", "body": [
                {"_type": "Expr", "value": {"_type": "Name", "id": "x", "ctx": {"_type": "Load"}}}
            ], "type_ignores": []}"#,
        )
        .unwrap();
        assert_eq!(count_nodes(&tree), 4);
    }
}
