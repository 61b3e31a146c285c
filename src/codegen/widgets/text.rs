use crate::codegen::dart::{color, font_size, launch_handler, string_literal, Call};
use crate::ir::{Color, LabelProps, LinkProps, ParagraphProps, TextAlign};

fn text_style(size: f64, fg: Color) -> Call {
    Call::new("TextStyle")
        .named("fontSize", font_size(size))
        .named("color", format!("const {}", color(fg)))
}

pub(super) fn label(props: &LabelProps) -> String {
    let mut style = text_style(props.font_size, props.color);
    if props.bold {
        style = style.named("fontWeight", "FontWeight.bold");
    }

    Call::new("Align")
        .named("alignment", "Alignment.centerLeft")
        .named(
            "child",
            Call::new("Text")
                .positional(string_literal(&props.text))
                .named("maxLines", "1")
                .named("overflow", "TextOverflow.ellipsis")
                .named("style", style),
        )
        .render()
}

pub(super) fn paragraph(props: &ParagraphProps) -> String {
    let align = match props.align {
        TextAlign::Left => "TextAlign.left",
        TextAlign::Center => "TextAlign.center",
        TextAlign::Right => "TextAlign.right",
        TextAlign::Justify => "TextAlign.justify",
    };

    Call::new("Text")
        .positional(string_literal(&props.text))
        .named("textAlign", align)
        .named("overflow", "TextOverflow.fade")
        .named("style", text_style(props.font_size, props.color))
        .render()
}

pub(super) fn link(props: &LinkProps) -> String {
    let style = text_style(props.font_size, props.color)
        .named("decoration", "TextDecoration.underline");

    Call::new("Align")
        .named("alignment", "Alignment.centerLeft")
        .named(
            "child",
            Call::new("GestureDetector")
                .named("onTap", launch_handler(&props.url))
                .named(
                    "child",
                    Call::new("Text")
                        .positional(string_literal(&props.text))
                        .named("overflow", "TextOverflow.ellipsis")
                        .named("style", style),
                ),
        )
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_label() {
        let code = label(&LabelProps {
            text: "Title".into(),
            bold: true,
            ..Default::default()
        });
        assert!(code.contains("'Title'"));
        assert!(code.contains("fontWeight: FontWeight.bold"));
        assert!(code.contains("fontSize: constraints.maxHeight * 0.0250"));
    }

    #[test]
    fn link_opens_url() {
        let code = link(&LinkProps::default());
        assert!(code.contains("launchUrl(Uri.parse('https://example.com')"));
        assert!(code.contains("TextDecoration.underline"));
    }

    #[test]
    fn link_without_url_is_inert() {
        let code = link(&LinkProps {
            url: String::new(),
            ..Default::default()
        });
        assert!(code.contains("onTap: null"));
    }

    #[test]
    fn paragraph_alignment() {
        let code = paragraph(&ParagraphProps {
            align: TextAlign::Justify,
            ..Default::default()
        });
        assert!(code.contains("textAlign: TextAlign.justify"));
    }
}
