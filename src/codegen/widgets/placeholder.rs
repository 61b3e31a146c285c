use crate::codegen::dart::{string_literal, Call};

const OUTLINE: &str = "Color(0xFF9CA3AF)";

/// Inert outlined box naming the kind this version cannot render.
pub(super) fn unknown(kind: &str) -> String {
    Call::new("IgnorePointer")
        .named(
            "child",
            Call::new("DecoratedBox")
                .named(
                    "decoration",
                    format!("BoxDecoration(border: Border.all(color: const {OUTLINE}))"),
                )
                .named(
                    "child",
                    Call::new("Center").named(
                        "child",
                        Call::new("Text")
                            .positional(string_literal(kind))
                            .named("overflow", "TextOverflow.ellipsis")
                            .named("style", format!("const TextStyle(color: {OUTLINE})")),
                    ),
                ),
        )
        .render()
}
