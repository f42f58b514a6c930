//! Plain-text outline of the chain tree.
//!
//! ```text
//! M1 [nível 0]
//! ├── M2 [nível 1]
//! │   └── M9 [nível 2]
//! └── T1 [nível 1]
//! ```
//!
//! Auxiliary links and unreachable documents follow in their own sections.

use super::Renderer;
use crate::ChainView;
use crate::layout::table::ChainRow;
use crate::model::DocumentId;

/// Renders the tree as indented text.
pub struct OutlineRenderer;

fn label(view: &ChainView, id: DocumentId) -> String {
    view.table
        .rows
        .iter()
        .find(|r| r.id == id)
        .map(row_label)
        .unwrap_or_else(|| format!("#{id}"))
}

fn row_label(row: &ChainRow) -> String {
    let mut s = format!("{} [nível {}]", row.code, row.level);
    if row.shared {
        s.push_str(" (compartilhado)");
    }
    if let Some(end) = row.chain_end {
        s.push_str(&format!(" · {}", end.label()));
    }
    s
}

fn code_of(view: &ChainView, id: DocumentId) -> String {
    view.layout
        .node(id)
        .map(|n| n.code.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

impl OutlineRenderer {
    fn walk(view: &ChainView, id: DocumentId, prefix: &str, out: &mut Vec<String>) {
        let children = view.tree.children(id);
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            let (branch, next) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            out.push(format!("{prefix}{branch}{}", label(view, *child)));
            Self::walk(view, *child, &format!("{prefix}{next}"), out);
        }
    }
}

impl Renderer for OutlineRenderer {
    fn render(&self, view: &ChainView) -> String {
        let root = view.tree.root;
        let mut lines = vec![label(view, root)];
        Self::walk(view, root, "", &mut lines);

        if !view.tree.auxiliary.is_empty() {
            lines.push(String::new());
            lines.push("Conexões auxiliares:".to_string());
            for link in &view.tree.auxiliary {
                lines.push(format!(
                    "  {} ⇢ {}",
                    code_of(view, link.to),
                    code_of(view, link.from)
                ));
            }
        }

        if !view.tree.unreachable.is_empty() {
            lines.push(String::new());
            lines.push("Documentos fora da cadeia:".to_string());
            for id in &view.tree.unreachable {
                lines.push(format!("  #{id}"));
            }
        }

        lines.join("\n")
    }
}
