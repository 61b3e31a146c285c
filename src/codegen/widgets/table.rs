use crate::codegen::dart::{color, font_size, fraction, list, string_literal, Call};
use crate::ir::{Color, TableProps};

const BORDER: Color = Color::rgb(0xd1d5db);

fn cell(text: &str, size: f64, bold: bool) -> String {
    let mut style = Call::new("TextStyle").named("fontSize", font_size(size));
    if bold {
        style = style.named("fontWeight", "FontWeight.bold");
    }

    Call::new("Padding")
        .named("padding", "const EdgeInsets.all(4)")
        .named(
            "child",
            Call::new("Text")
                .positional(string_literal(text))
                .named("overflow", "TextOverflow.ellipsis")
                .named("style", style),
        )
        .render()
}

/// Builds one row with exactly `columns` cells; short rows are padded with
/// empty cells and long rows truncated, since Flutter tables must be regular.
fn row(values: &[String], columns: usize, size: f64, header: Option<Color>) -> String {
    let cells: Vec<String> = (0..columns)
        .map(|i| {
            let text = values.get(i).map(String::as_str).unwrap_or_default();
            cell(text, size, header.is_some())
        })
        .collect();

    let mut call = Call::new("TableRow");
    if let Some(fill) = header {
        call = call.named(
            "decoration",
            format!("const BoxDecoration(color: {})", color(fill)),
        );
    }
    call.named("children", list("", &cells)).render()
}

pub(super) fn table(props: &TableProps) -> String {
    let columns = if props.headers.is_empty() {
        props.rows.iter().map(Vec::len).max().unwrap_or(0)
    } else {
        props.headers.len()
    };
    if columns == 0 {
        return "const SizedBox.shrink()".to_string();
    }

    let widths: Vec<String> = (0..columns)
        .map(|i| {
            let width = props
                .col_widths
                .get(i)
                .copied()
                .filter(|_| props.col_widths.len() == columns)
                .unwrap_or(1.0 / columns as f64);
            format!("{i}: FractionColumnWidth({})", fraction(width))
        })
        .collect();

    let mut rows = Vec::with_capacity(props.rows.len() + 1);
    if !props.headers.is_empty() {
        rows.push(row(&props.headers, columns, props.font_size, Some(props.header_color)));
    }
    for values in &props.rows {
        rows.push(row(values, columns, props.font_size, None));
    }

    Call::new("SingleChildScrollView")
        .named(
            "child",
            Call::new("Table")
                .named(
                    "border",
                    format!("TableBorder.all(color: const {})", color(BORDER)),
                )
                .named(
                    "columnWidths",
                    format!("const <int, TableColumnWidth>{{{}}}", widths.join(", ")),
                )
                .named("children", list("", &rows)),
        )
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_header_width() {
        let code = table(&TableProps {
            headers: vec!["Name".into(), "Qty".into(), "Price".into()],
            rows: vec![
                vec!["Apple".into()],
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ],
            col_widths: vec![1.0 / 3.0; 3],
            ..Default::default()
        });

        assert_eq!(code.matches("TableRow(").count(), 3);
        assert_eq!(code.matches("Padding(").count(), 9);
        assert!(!code.contains("'d'"));
        assert!(code.contains("2: FractionColumnWidth(0.3333)"));
    }

    #[test]
    fn header_row_is_bold_and_tinted() {
        let code = table(&TableProps::default());
        assert!(code.contains("const BoxDecoration(color: Color(0xFFE5E7EB))"));
        assert!(code.contains("FontWeight.bold"));
        assert!(code.contains("0: FractionColumnWidth(0.5000), 1: FractionColumnWidth(0.5000)"));
    }

    #[test]
    fn empty_table_renders_nothing() {
        let code = table(&TableProps {
            headers: Vec::new(),
            rows: Vec::new(),
            col_widths: Vec::new(),
            ..Default::default()
        });
        assert_eq!(code, "const SizedBox.shrink()");
    }
}
