//! Auxiliary component registry.
//!
//! Stateful widgets (inputs, checkboxes, dropdowns), the ellipse painter and
//! the autoplay launcher need a helper class next to the screen. Each
//! distinct helper is emitted once per source unit, keyed by its signature.

use std::collections::BTreeMap;

/// Identity of an auxiliary definition: element kind plus the prop shape that
/// changes the generated class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuxSignature {
    TextInput { obscured: bool },
    DateInput,
    Checkbox,
    Dropdown,
    EllipsePainter,
    MediaAutoplay,
}

impl AuxSignature {
    /// The private Dart class name of the helper.
    pub fn class_name(&self) -> &'static str {
        match self {
            AuxSignature::TextInput { obscured: false } => "_TextInputField",
            AuxSignature::TextInput { obscured: true } => "_ObscuredTextInputField",
            AuxSignature::DateInput => "_DateInputField",
            AuxSignature::Checkbox => "_CheckboxField",
            AuxSignature::Dropdown => "_DropdownField",
            AuxSignature::EllipsePainter => "_EllipsePainter",
            AuxSignature::MediaAutoplay => "_AutoplayLauncher",
        }
    }
}

/// One emitted helper definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuxComponent {
    pub signature: AuxSignature,
    pub class_name: &'static str,
    pub code: String,
}

/// Per-unit set of helper definitions.
#[derive(Debug, Default)]
pub struct AuxRegistry {
    components: BTreeMap<AuxSignature, AuxComponent>,
}

impl AuxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a helper and returns its class name.
    ///
    /// `define` is only called the first time a signature is seen.
    pub fn register(
        &mut self,
        signature: AuxSignature,
        define: impl FnOnce(&str) -> String,
    ) -> &'static str {
        let class_name = signature.class_name();
        self.components
            .entry(signature)
            .or_insert_with(|| AuxComponent {
                signature,
                class_name,
                code: define(class_name),
            });
        class_name
    }

    pub fn contains(&self, signature: AuxSignature) -> bool {
        self.components.contains_key(&signature)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Consumes the registry, yielding definitions sorted by signature.
    pub fn into_components(self) -> Vec<AuxComponent> {
        self.components.into_values().collect()
    }
}
