//! Image, video and audio elements.
//!
//! Video and audio render as tap-to-open tiles that hand the URL to the
//! platform, which keeps the generated app free of media plugins. With
//! `autoplay` set, the URL is also opened once after the tile first builds.

use crate::codegen::dart::{launch_handler, list, string_literal, Call};
use crate::codegen::{AuxSignature, ScreenContext};
use crate::ir::{ImageFit, ImageProps, MediaProps};

const AUTOPLAY_LAUNCHER: &str = r#"class __NAME__ extends StatefulWidget {
  const __NAME__({super.key, required this.url, required this.child});

  final String url;
  final Widget child;

  @override
  State<__NAME__> createState() => __NAME__State();
}

class __NAME__State extends State<__NAME__> {
  @override
  void initState() {
    super.initState();
    WidgetsBinding.instance.addPostFrameCallback((_) {
      launchUrl(Uri.parse(widget.url), mode: LaunchMode.externalApplication);
    });
  }

  @override
  Widget build(BuildContext context) => widget.child;
}"#;

/// Wraps `tile` in the autoplay launcher when the media asks for it.
fn with_autoplay(props: &MediaProps, tile: String, ctx: &mut ScreenContext<'_>) -> String {
    let url = props.url.trim();
    if !props.autoplay || url.is_empty() {
        return tile;
    }

    let class = ctx.registry.register(AuxSignature::MediaAutoplay, |name| {
        AUTOPLAY_LAUNCHER.replace("__NAME__", name)
    });
    Call::new(class)
        .named("url", string_literal(url))
        .named("child", tile)
        .render()
}

pub(super) fn image(props: &ImageProps) -> String {
    let url = props.url.trim();
    if url.is_empty() {
        return Call::new("Container")
            .named("color", "const Color(0xFFE5E7EB)")
            .named("alignment", "Alignment.center")
            .named("child", "const Icon(Icons.image, color: Color(0xFF9CA3AF))")
            .render();
    }

    let fit = match props.fit {
        ImageFit::Cover => "BoxFit.cover",
        ImageFit::Contain => "BoxFit.contain",
        ImageFit::Fill => "BoxFit.fill",
    };

    Call::new("Image.network")
        .positional(string_literal(url))
        .named("fit", fit)
        .named(
            "errorBuilder",
            "(context, error, stackTrace) => const Icon(Icons.broken_image)",
        )
        .render()
}

pub(super) fn video(props: &MediaProps, ctx: &mut ScreenContext<'_>) -> String {
    let tile = Call::new("GestureDetector")
        .named("onTap", launch_handler(&props.url))
        .named(
            "child",
            Call::new("Container")
                .named("color", "Colors.black")
                .named("alignment", "Alignment.center")
                .named(
                    "child",
                    "const Icon(Icons.play_circle_outline, color: Colors.white, size: 48)",
                ),
        )
        .render();
    with_autoplay(props, tile, ctx)
}

pub(super) fn audio(props: &MediaProps, ctx: &mut ScreenContext<'_>) -> String {
    let row = Call::new("const Row").named(
        "children",
        list(
            "",
            &[
                "Icon(Icons.play_arrow)".to_string(),
                "SizedBox(width: 8)".to_string(),
                "Expanded(child: Text('Audio', overflow: TextOverflow.ellipsis))".to_string(),
            ],
        ),
    );

    let tile = Call::new("GestureDetector")
        .named("onTap", launch_handler(&props.url))
        .named(
            "child",
            Call::new("Container")
                .named(
                    "decoration",
                    Call::new("BoxDecoration")
                        .named("color", "const Color(0xFFF3F4F6)")
                        .named("borderRadius", "BorderRadius.circular(8)"),
                )
                .named("padding", "const EdgeInsets.symmetric(horizontal: 8)")
                .named("child", row),
        )
        .render();
    with_autoplay(props, tile, ctx)
}
