//! Deterministic identifiers derived from screen names.
//!
//! A screen's route id, Dart class name and file name all come from its
//! display name, so navigation targets (which refer to screens by name) can
//! be resolved without any lookup table beyond the project itself.

/// Names generated for one screen.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScreenNames {
    /// Identifier-safe snake case id, e.g. `home_page`.
    pub route_id: String,
    /// Route path registered with the navigator, e.g. `/home_page`.
    pub route_path: String,
    /// Dart widget class, e.g. `HomePageScreen` (`HomepageScreen` for the
    /// route id `homepage`).
    pub class_name: String,
    /// File name under `lib/screens/`, e.g. `home_page_screen.dart`.
    pub file_name: String,
}

impl ScreenNames {
    /// Derives all names from a screen's display name.
    pub fn from_name(name: &str) -> Self {
        let route_id = route_id(name);

        // Built from the route id so that distinct routes get distinct classes
        // wherever capitalization can tell them apart.
        let camel: String = route_id.split('_').map(capitalize).collect();
        let class_name = format!("{camel}Screen");

        Self {
            route_path: format!("/{route_id}"),
            file_name: format!("{route_id}_screen.dart"),
            route_id,
            class_name,
        }
    }
}

/// Derives the route id for a screen name.
///
/// `"Home Page"` and `"home-page"` both map to `home_page`; validation
/// rejects projects where two screens collide this way.
pub fn route_id(name: &str) -> String {
    route_id_from_words(&words(name))
}

fn route_id_from_words(words: &[String]) -> String {
    let joined = words
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    if joined.is_empty() {
        "screen".to_string()
    } else if joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("screen_{joined}")
    } else {
        joined
    }
}

/// Splits a display name into ASCII alphanumeric words.
fn words(name: &str) -> Vec<String> {
    name.chars()
        .map(fold_accent)
        .collect::<String>()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Maps common Latin accented letters to their ASCII base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}
