//! Aligned text table of the chain, one row per document in tree order.

use super::Renderer;
use crate::ChainView;

/// Renders `ChainView::table` as fixed-width columns.
pub struct TableRenderer;

const HEADERS: [&str; 7] = [
    "Documento",
    "Tipo",
    "Nível",
    "Lançamentos",
    "Origem escolhida",
    "Origens",
    "Fim de cadeia",
];

impl Renderer for TableRenderer {
    fn render(&self, view: &ChainView) -> String {
        let rows: Vec<[String; 7]> = view
            .table
            .rows
            .iter()
            .map(|r| {
                let code = if r.shared {
                    format!("{}*", r.code)
                } else {
                    r.code.clone()
                };
                [
                    code,
                    r.kind.label().to_string(),
                    r.level.to_string(),
                    r.recordings.to_string(),
                    r.chosen_origin.clone().unwrap_or_else(|| "-".to_string()),
                    if r.origins.is_empty() {
                        "-".to_string()
                    } else {
                        r.origins.join(", ")
                    },
                    r.chain_end.map_or("-", |e| e.label()).to_string(),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c}{}", " ".repeat(w - c.chars().count())))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        let mut out = vec![line(header.as_slice()), line(rule.as_slice())];
        out.extend(rows.iter().map(|r| line(r.as_slice())));
        if view.table.rows.iter().any(|r| r.shared) {
            out.push(String::new());
            out.push("* documento compartilhado".to_string());
        }
        out.join("\n")
    }
}
