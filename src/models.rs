// src/models.rs

//! Data model shared by the compiler, the validator, the binder and the controller.

use crate::core::registry::ParamRegistry;
use std::collections::BTreeMap;

// --- CONFIGURATION MODELS (handed over by the loader) ---

/// One menu definition as extracted from the settings file, before compilation.
///
/// The loader owns the file format; the compiler only ever sees this plain record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntrySource {
    pub title: String,
    pub command: String,
    /// Raw label keys (`$1`, `$*`, ...) mapped to display labels.
    pub labels: BTreeMap<String, String>,
}

impl EntrySource {
    /// Convenience constructor used by the loader and by tests.
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Adds a display label for a parameter key such as `$1` or `$*`.
    pub fn with_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(key.into(), label.into());
        self
    }
}

// --- COMPILED TEMPLATE ---

/// One piece of a single argv token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Text copied verbatim.
    Literal(String),
    /// `$N`: replaced by the N-th operator token (1-based).
    ParamRef(usize),
    /// `$*`: expands into one argv entry per remaining operator token.
    /// Always the only segment of its token.
    Variadic,
}

/// The substitution-aware form of a configured command line.
///
/// Built only by the compiler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    tokens: Vec<Vec<TemplateSegment>>,
    required_count: usize,
    has_variadic: bool,
}

impl CompiledTemplate {
    pub(crate) fn new(tokens: Vec<Vec<TemplateSegment>>) -> Self {
        let required_count = tokens
            .iter()
            .flatten()
            .filter_map(|segment| match segment {
                TemplateSegment::ParamRef(index) => Some(*index),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let has_variadic = tokens
            .iter()
            .flatten()
            .any(|segment| matches!(segment, TemplateSegment::Variadic));

        Self {
            tokens,
            required_count,
            has_variadic,
        }
    }

    /// The argv tokens, each an ordered list of segments.
    pub fn tokens(&self) -> &[Vec<TemplateSegment>] {
        &self.tokens
    }

    /// Highest `$N` index referenced, 0 when there is none.
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    /// Whether the template contains the `$*` marker.
    pub fn has_variadic(&self) -> bool {
        self.has_variadic
    }

    /// Indices in `1..=required_count` that no `$N` references.
    pub fn unreferenced_indices(&self) -> Vec<usize> {
        (1..=self.required_count)
            .filter(|index| {
                !self
                    .tokens
                    .iter()
                    .flatten()
                    .any(|segment| *segment == TemplateSegment::ParamRef(*index))
            })
            .collect()
    }
}

// --- RUNTIME MODELS ---

/// A selectable menu line. Created once at load time, immutable afterwards.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    index: usize,
    title: String,
    template: CompiledTemplate,
    registry: ParamRegistry,
}

impl MenuEntry {
    pub(crate) fn new(
        index: usize,
        title: String,
        template: CompiledTemplate,
        registry: ParamRegistry,
    ) -> Self {
        Self {
            index,
            title,
            template,
            registry,
        }
    }

    /// 1-based position in the menu; also the number the operator types.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn template(&self) -> &CompiledTemplate {
        &self.template
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    pub fn required_count(&self) -> usize {
        self.template.required_count()
    }

    pub fn has_variadic(&self) -> bool {
        self.template.has_variadic()
    }

    /// Whether `given` operator tokens satisfy this entry's arity.
    pub fn accepts_token_count(&self, given: usize) -> bool {
        if self.has_variadic() {
            given >= self.required_count()
        } else {
            given == self.required_count()
        }
    }
}

/// A validated operator request: which entry, with which raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSelection {
    pub entry_index: usize,
    pub raw_tokens: Vec<String>,
}

/// The fully resolved argument vector for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundCommand {
    argv: Vec<String>,
}

impl BoundCommand {
    pub(crate) fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The executable path, when the vector is not empty.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Everything after the executable.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// A shell-quoted rendering for logs and status lines. Never executed.
    pub fn display(&self) -> String {
        shlex::try_join(self.argv.iter().map(String::as_str))
            .unwrap_or_else(|_| self.argv.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> TemplateSegment {
        TemplateSegment::Literal(s.to_string())
    }

    #[test]
    fn test_template_derives_counts() {
        let template = CompiledTemplate::new(vec![
            vec![literal("/bin/echo")],
            vec![literal("--name="), TemplateSegment::ParamRef(2)],
            vec![TemplateSegment::Variadic],
        ]);
        assert_eq!(template.required_count(), 2);
        assert!(template.has_variadic());
        assert_eq!(template.unreferenced_indices(), vec![1]);
    }

    #[test]
    fn test_template_without_references() {
        let template = CompiledTemplate::new(vec![vec![literal("/bin/true")]]);
        assert_eq!(template.required_count(), 0);
        assert!(!template.has_variadic());
        assert!(template.unreferenced_indices().is_empty());
    }

    #[test]
    fn test_bound_command_parts() {
        let bound = BoundCommand::new(vec!["/bin/echo".into(), "two words".into()]);
        assert_eq!(bound.program(), Some("/bin/echo"));
        assert_eq!(bound.args(), &["two words".to_string()]);
        let shown = bound.display();
        assert!(shown.starts_with("/bin/echo "));
        assert_eq!(shlex::split(&shown).unwrap(), bound.argv());
    }

    #[test]
    fn test_empty_bound_command() {
        let bound = BoundCommand::new(Vec::new());
        assert_eq!(bound.program(), None);
        assert!(bound.args().is_empty());
    }
}
