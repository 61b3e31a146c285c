//! Buttons and stateful form controls.
//!
//! Stateful controls register a private helper widget with the screen's
//! [`AuxRegistry`](crate::codegen::AuxRegistry) and render as a call to it.

use crate::codegen::dart::{color, double, font_size, string_list, string_literal, Call};
use crate::codegen::{AuxSignature, ScreenContext};
use crate::ir::{ButtonProps, CheckboxProps, InputDateProps, InputTextProps, SelectorProps};

const NAME: &str = "__NAME__";

const TEXT_INPUT: &str = r#"class __NAME__ extends StatefulWidget {
  const __NAME__({super.key, required this.placeholder, required this.fontSize});

  final String placeholder;
  final double fontSize;

  @override
  State<__NAME__> createState() => __NAME__State();
}

class __NAME__State extends State<__NAME__> {
  final TextEditingController _controller = TextEditingController();

  @override
  void dispose() {
    _controller.dispose();
    super.dispose();
  }

  @override
  Widget build(BuildContext context) {
    return TextField(
      controller: _controller,
      obscureText: __OBSCURED__,
      style: TextStyle(fontSize: widget.fontSize),
      decoration: InputDecoration(
        hintText: widget.placeholder,
        border: const OutlineInputBorder(),
        isDense: true,
      ),
    );
  }
}"#;

const DATE_INPUT: &str = r#"class __NAME__ extends StatefulWidget {
  const __NAME__({super.key, required this.placeholder, required this.fontSize});

  final String placeholder;
  final double fontSize;

  @override
  State<__NAME__> createState() => __NAME__State();
}

class __NAME__State extends State<__NAME__> {
  DateTime? _value;

  Future<void> _pick() async {
    final picked = await showDatePicker(
      context: context,
      initialDate: _value ?? DateTime.now(),
      firstDate: DateTime(1900),
      lastDate: DateTime(2100),
    );
    if (picked != null) {
      setState(() => _value = picked);
    }
  }

  String _format(DateTime value) {
    final month = value.month.toString().padLeft(2, '0');
    final day = value.day.toString().padLeft(2, '0');
    return '${value.year}-$month-$day';
  }

  @override
  Widget build(BuildContext context) {
    final value = _value;
    return InkWell(
      onTap: _pick,
      child: InputDecorator(
        decoration: const InputDecoration(
          border: OutlineInputBorder(),
          isDense: true,
          suffixIcon: Icon(Icons.calendar_today),
        ),
        child: Text(
          value == null ? widget.placeholder : _format(value),
          overflow: TextOverflow.ellipsis,
          style: TextStyle(fontSize: widget.fontSize),
        ),
      ),
    );
  }
}"#;

const CHECKBOX: &str = r#"class __NAME__ extends StatefulWidget {
  const __NAME__({
    super.key,
    required this.text,
    required this.fontSize,
    this.initialValue = false,
  });

  final String text;
  final double fontSize;
  final bool initialValue;

  @override
  State<__NAME__> createState() => __NAME__State();
}

class __NAME__State extends State<__NAME__> {
  late bool _value = widget.initialValue;

  @override
  Widget build(BuildContext context) {
    return Row(
      children: [
        Checkbox(
          value: _value,
          onChanged: (value) => setState(() => _value = value ?? false),
        ),
        Expanded(
          child: Text(
            widget.text,
            overflow: TextOverflow.ellipsis,
            style: TextStyle(fontSize: widget.fontSize),
          ),
        ),
      ],
    );
  }
}"#;

const DROPDOWN: &str = r#"class __NAME__ extends StatefulWidget {
  const __NAME__({super.key, required this.options, required this.fontSize});

  final List<String> options;
  final double fontSize;

  @override
  State<__NAME__> createState() => __NAME__State();
}

class __NAME__State extends State<__NAME__> {
  late String? _value = widget.options.isEmpty ? null : widget.options.first;

  @override
  Widget build(BuildContext context) {
    return DropdownButton<String>(
      value: _value,
      isExpanded: true,
      style: TextStyle(fontSize: widget.fontSize, color: Colors.black87),
      items: [
        for (final option in widget.options)
          DropdownMenuItem<String>(value: option, child: Text(option)),
      ],
      onChanged: (value) => setState(() => _value = value),
    );
  }
}"#;

pub(super) fn button(props: &ButtonProps) -> String {
    Call::new("ElevatedButton")
        .named("onPressed", "() {}")
        .named(
            "style",
            Call::new("ElevatedButton.styleFrom")
                .named("backgroundColor", format!("const {}", color(props.bg_color)))
                .named("foregroundColor", format!("const {}", color(props.text_color)))
                .named("padding", "EdgeInsets.zero")
                .named(
                    "shape",
                    Call::new("RoundedRectangleBorder").named(
                        "borderRadius",
                        format!("BorderRadius.circular({})", double(props.border_radius)),
                    ),
                ),
        )
        .named(
            "child",
            Call::new("FittedBox")
                .named("fit", "BoxFit.scaleDown")
                .named(
                    "child",
                    Call::new("Text")
                        .positional(string_literal(&props.text))
                        .named(
                            "style",
                            Call::new("TextStyle").named("fontSize", font_size(props.font_size)),
                        ),
                ),
        )
        .render()
}

pub(super) fn text_input(props: &InputTextProps, ctx: &mut ScreenContext<'_>) -> String {
    let obscured = props.obscured;
    let class = ctx
        .registry
        .register(AuxSignature::TextInput { obscured }, |name| {
            TEXT_INPUT
                .replace(NAME, name)
                .replace("__OBSCURED__", if obscured { "true" } else { "false" })
        });

    Call::new(class)
        .named("placeholder", string_literal(&props.placeholder))
        .named("fontSize", font_size(props.font_size))
        .render()
}

pub(super) fn date_input(props: &InputDateProps, ctx: &mut ScreenContext<'_>) -> String {
    let class = ctx
        .registry
        .register(AuxSignature::DateInput, |name| DATE_INPUT.replace(NAME, name));

    Call::new(class)
        .named("placeholder", string_literal(&props.placeholder))
        .named("fontSize", font_size(props.font_size))
        .render()
}

pub(super) fn checkbox(props: &CheckboxProps, ctx: &mut ScreenContext<'_>) -> String {
    let class = ctx
        .registry
        .register(AuxSignature::Checkbox, |name| CHECKBOX.replace(NAME, name));

    Call::new(class)
        .named("text", string_literal(&props.text))
        .named("fontSize", font_size(props.font_size))
        .named("initialValue", props.checked.to_string())
        .render()
}

pub(super) fn selector(props: &SelectorProps, ctx: &mut ScreenContext<'_>) -> String {
    let class = ctx
        .registry
        .register(AuxSignature::Dropdown, |name| DROPDOWN.replace(NAME, name));

    // DropdownButton requires distinct values.
    let mut options: Vec<String> = Vec::with_capacity(props.options.len());
    for option in &props.options {
        if !options.contains(option) {
            options.push(option.clone());
        }
    }

    Call::new(class)
        .named("options", format!("const {}", string_list(&options)))
        .named("fontSize", font_size(props.font_size))
        .render()
}
