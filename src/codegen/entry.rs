//! The app entry module: `lib/main.dart` with the route table.

use super::dart::string_literal;
use super::{RouteTable, SourceFile, SOURCE_ROOT};
use crate::ir::Project;

const DEFAULT_TITLE: &str = "Generated App";

pub(crate) fn render_entry(project: &Project, routes: &RouteTable) -> SourceFile {
    let title = project
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let mut out = String::new();
    out.push_str("// Generated by sketchport. Do not edit by hand.\n");
    out.push_str("import 'package:flutter/material.dart';\n\n");
    for route in routes.entries() {
        out.push_str(&format!("import 'screens/{}';\n", route.names.file_name));
    }
    out.push('\n');

    out.push_str("void main() => runApp(const GeneratedApp());\n\n");

    out.push_str("/// One route per screen.\n");
    out.push_str("final Map<String, WidgetBuilder> appRoutes = <String, WidgetBuilder>{\n");
    for route in routes.entries() {
        out.push_str(&format!(
            "  {}: (context) => const {}(),\n",
            string_literal(&route.names.route_path),
            route.names.class_name
        ));
    }
    out.push_str("};\n\n");

    let initial = routes
        .home()
        .map(|r| r.names.route_path.as_str())
        .unwrap_or("/");

    out.push_str("class GeneratedApp extends StatelessWidget {\n");
    out.push_str("  const GeneratedApp({super.key});\n\n");
    out.push_str("  @override\n");
    out.push_str("  Widget build(BuildContext context) {\n");
    out.push_str("    return MaterialApp(\n");
    out.push_str(&format!("      title: {},\n", string_literal(title)));
    out.push_str("      debugShowCheckedModeBanner: false,\n");
    out.push_str("      theme: ThemeData(useMaterial3: true),\n");
    out.push_str(&format!("      initialRoute: {},\n", string_literal(initial)));
    out.push_str("      routes: appRoutes,\n");
    out.push_str("    );\n");
    out.push_str("  }\n");
    out.push_str("}\n");

    SourceFile {
        path: format!("{SOURCE_ROOT}/main.dart"),
        contents: out,
    }
}
