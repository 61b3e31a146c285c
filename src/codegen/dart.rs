//! Small Dart source helpers shared by the widget handlers.

use crate::ir::{Color, Normalized, Rect};

/// Name of the `BoxConstraints` binding inside the screen's `LayoutBuilder`.
pub(crate) const CONSTRAINTS: &str = "constraints";

/// Quotes a string as a single-quoted Dart literal.
///
/// Backslashes, quotes, `$` (interpolation) and control characters are
/// escaped so user text can never break out of the literal.
pub(crate) fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// A `<String>[...]` list literal.
pub(crate) fn string_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("<String>[{}]", items.join(", "))
}

/// A `Color(0xAARRGGBB)` constructor.
pub(crate) fn color(value: Color) -> String {
    format!("Color(0x{:08X})", value.as_argb())
}

/// Formats a canvas fraction. Non-finite values become zero and the result is
/// clamped to `[0, 1]` so malformed geometry still renders on the canvas.
pub(crate) fn fraction(value: f64) -> String {
    let value = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!("{value:.4}")
}

/// A logical-pixel double literal (`4.0`, `1.5`).
pub(crate) fn double(value: f64) -> String {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
    let text = format!("{value}");
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

pub(crate) fn width(value: f64) -> String {
    format!("{CONSTRAINTS}.maxWidth * {}", fraction(value))
}

pub(crate) fn height(value: f64) -> String {
    format!("{CONSTRAINTS}.maxHeight * {}", fraction(value))
}

/// Font sizes scale with canvas height.
pub(crate) fn font_size(value: f64) -> String {
    height(value)
}

/// Wraps a widget expression in a `Positioned` at `rect`.
pub(crate) fn positioned(rect: &Rect<Normalized>, child: impl Into<String>) -> String {
    Call::new("Positioned")
        .named("left", width(rect.x))
        .named("top", height(rect.y))
        .named("width", width(rect.w))
        .named("height", height(rect.h))
        .named("child", child)
        .render()
}

/// `() => launchUrl(...)` for a non-empty URL, `null` otherwise.
pub(crate) fn launch_handler(url: &str) -> String {
    if url.trim().is_empty() {
        "null".to_string()
    } else {
        format!(
            "() => launchUrl(Uri.parse({}), mode: LaunchMode.externalApplication)",
            string_literal(url.trim())
        )
    }
}

/// Builder for a Dart constructor or function call, rendered with one
/// argument per line and trailing commas.
#[derive(Clone, Debug)]
pub(crate) struct Call {
    head: String,
    args: Vec<String>,
}

impl Call {
    pub(crate) fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            args: Vec::new(),
        }
    }

    pub(crate) fn positional(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    pub(crate) fn named(mut self, name: &str, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.args.push(format!("{name}: {value}"));
        self
    }

    pub(crate) fn named_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.named(name, value),
            None => self,
        }
    }

    pub(crate) fn render(&self) -> String {
        if self.args.is_empty() {
            return format!("{}()", self.head);
        }
        let mut out = format!("{}(\n", self.head);
        for arg in &self.args {
            out.push_str("  ");
            out.push_str(&nest(arg, 2));
            out.push_str(",\n");
        }
        out.push(')');
        out
    }
}

impl From<Call> for String {
    fn from(call: Call) -> Self {
        call.render()
    }
}

/// A list literal with one element per line, e.g. `list("<Widget>", items)`.
pub(crate) fn list(type_args: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{type_args}[]");
    }
    let mut out = format!("{type_args}[\n");
    for item in items {
        out.push_str("  ");
        out.push_str(&nest(item, 2));
        out.push_str(",\n");
    }
    out.push(']');
    out
}

/// Indents every line after the first, so a multi-line expression can follow
/// a `name: ` prefix that is itself indented by `spaces`.
pub(crate) fn nest(code: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut lines = code.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// Indents every non-empty line by `spaces`.
pub(crate) fn indent(code: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
