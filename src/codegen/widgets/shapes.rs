use crate::codegen::dart::{color, double, Call};
use crate::codegen::{AuxSignature, ScreenContext};
use crate::ir::ShapeProps;

const ELLIPSE_PAINTER: &str = r#"class __NAME__ extends CustomPainter {
  const __NAME__({required this.fill, this.stroke, this.strokeWidth = 0});

  final Color fill;
  final Color? stroke;
  final double strokeWidth;

  @override
  void paint(Canvas canvas, Size size) {
    final bounds = Offset.zero & size;
    canvas.drawOval(bounds, Paint()..color = fill);
    final stroke = this.stroke;
    if (stroke != null && strokeWidth > 0) {
      canvas.drawOval(
        bounds.deflate(strokeWidth / 2),
        Paint()
          ..color = stroke
          ..style = PaintingStyle.stroke
          ..strokeWidth = strokeWidth,
      );
    }
  }

  @override
  bool shouldRepaint(covariant __NAME__ oldDelegate) =>
      oldDelegate.fill != fill ||
      oldDelegate.stroke != stroke ||
      oldDelegate.strokeWidth != strokeWidth;
}"#;

/// The border, when the shape has a visible one.
fn stroke(props: &ShapeProps) -> Option<(String, String)> {
    let border = props.border_color?;
    (props.border_width.is_finite() && props.border_width > 0.0)
        .then(|| (color(border), double(props.border_width)))
}

pub(super) fn rectangle(props: &ShapeProps) -> String {
    let mut decoration =
        Call::new("BoxDecoration").named("color", format!("const {}", color(props.fill)));
    if let Some((border, width)) = stroke(props) {
        decoration = decoration.named(
            "border",
            format!("Border.all(color: const {border}, width: {width})"),
        );
    }
    if props.border_radius.is_finite() && props.border_radius > 0.0 {
        decoration = decoration.named(
            "borderRadius",
            format!("BorderRadius.circular({})", double(props.border_radius)),
        );
    }

    Call::new("Container")
        .named("decoration", decoration)
        .render()
}

pub(super) fn ellipse(props: &ShapeProps, ctx: &mut ScreenContext<'_>) -> String {
    let class = ctx
        .registry
        .register(AuxSignature::EllipsePainter, |name| {
            ELLIPSE_PAINTER.replace("__NAME__", name)
        });

    let mut painter = Call::new(format!("const {class}")).named("fill", color(props.fill));
    if let Some((border, width)) = stroke(props) {
        painter = painter.named("stroke", border).named("strokeWidth", width);
    }

    Call::new("CustomPaint")
        .named("painter", painter)
        .render()
}
