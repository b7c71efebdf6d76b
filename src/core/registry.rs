// src/core/registry.rs

//! Display labels for an entry's parameter slots.
//!
//! Labels are purely cosmetic: a missing label falls back to a placeholder, and a label
//! for a slot the template never uses is kept but never shown.

use crate::models::CompiledTemplate;
use std::collections::BTreeMap;

/// A parameter position that can carry a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamSlot {
    /// `$N`, 1-based.
    Index(usize),
    /// `$*`.
    Variadic,
}

impl ParamSlot {
    /// Parses a configuration key such as `$1` or `$*`.
    pub fn parse_key(key: &str) -> Option<Self> {
        let rest = key.strip_prefix('$')?;
        if rest == "*" {
            return Some(Self::Variadic);
        }
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        rest.parse::<usize>()
            .ok()
            .filter(|index| *index > 0)
            .map(Self::Index)
    }
}

/// One slot as the renderer should show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLabel<'a> {
    pub slot: ParamSlot,
    /// `None` means "use the generic placeholder".
    pub label: Option<&'a str>,
}

/// Maps parameter slots to their display labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamRegistry {
    labels: BTreeMap<ParamSlot, String>,
}

impl ParamRegistry {
    /// Builds a registry from raw configuration keys. Keys that do not name a slot are
    /// logged and skipped.
    pub fn from_labels(raw: &BTreeMap<String, String>) -> Self {
        let mut labels = BTreeMap::new();
        for (key, label) in raw {
            match ParamSlot::parse_key(key) {
                Some(slot) => {
                    labels.insert(slot, label.clone());
                }
                None => log::warn!("Ignoring label key '{}': expected '$N' or '$*'.", key),
            }
        }
        Self { labels }
    }

    pub fn label(&self, slot: ParamSlot) -> Option<&str> {
        self.labels.get(&slot).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels that the template can never surface.
    pub fn dead_slots(&self, template: &CompiledTemplate) -> Vec<ParamSlot> {
        self.labels
            .keys()
            .copied()
            .filter(|slot| match slot {
                ParamSlot::Index(index) => *index > template.required_count(),
                ParamSlot::Variadic => !template.has_variadic(),
            })
            .collect()
    }

    /// Logs dead labels. Never fails: labels cannot block an entry.
    pub fn check_against(&self, title: &str, template: &CompiledTemplate) {
        for slot in self.dead_slots(template) {
            log::debug!("Entry '{}' has a label for unused slot {:?}.", title, slot);
        }
    }

    /// The slots the operator has to fill, in order, with their labels if any.
    pub fn display_slots<'a>(&'a self, template: &CompiledTemplate) -> Vec<SlotLabel<'a>> {
        let mut slots: Vec<SlotLabel<'a>> = (1..=template.required_count())
            .map(|index| SlotLabel {
                slot: ParamSlot::Index(index),
                label: self.label(ParamSlot::Index(index)),
            })
            .collect();
        if template.has_variadic() {
            slots.push(SlotLabel {
                slot: ParamSlot::Variadic,
                label: self.label(ParamSlot::Variadic),
            });
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::compile_template;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(ParamSlot::parse_key("$1"), Some(ParamSlot::Index(1)));
        assert_eq!(ParamSlot::parse_key("$10"), Some(ParamSlot::Index(10)));
        assert_eq!(ParamSlot::parse_key("$*"), Some(ParamSlot::Variadic));
        assert_eq!(ParamSlot::parse_key("$0"), None);
        assert_eq!(ParamSlot::parse_key("$"), None);
        assert_eq!(ParamSlot::parse_key("$x"), None);
        assert_eq!(ParamSlot::parse_key("1"), None);
    }

    #[test]
    fn test_invalid_keys_are_skipped() {
        let registry = ParamRegistry::from_labels(&raw(&[("$1", "NAME"), ("bogus", "X")]));
        assert_eq!(registry.label(ParamSlot::Index(1)), Some("NAME"));
        assert_eq!(registry.labels.len(), 1);
    }

    #[test]
    fn test_display_slots_fill_gaps_with_none() {
        let template = compile_template("/bin/echo $1 $3 $*").unwrap();
        let registry = ParamRegistry::from_labels(&raw(&[("$3", "LAST"), ("$*", "REST")]));
        let slots = registry.display_slots(&template);
        assert_eq!(
            slots,
            vec![
                SlotLabel { slot: ParamSlot::Index(1), label: None },
                SlotLabel { slot: ParamSlot::Index(2), label: None },
                SlotLabel { slot: ParamSlot::Index(3), label: Some("LAST") },
                SlotLabel { slot: ParamSlot::Variadic, label: Some("REST") },
            ]
        );
    }

    #[test]
    fn test_dead_labels_are_kept_but_not_displayed() {
        let template = compile_template("/bin/echo $1").unwrap();
        let registry = ParamRegistry::from_labels(&raw(&[("$1", "A"), ("$4", "D"), ("$*", "R")]));
        assert_eq!(
            registry.dead_slots(&template),
            vec![ParamSlot::Index(4), ParamSlot::Variadic]
        );
        assert_eq!(registry.display_slots(&template).len(), 1);
        assert_eq!(registry.label(ParamSlot::Index(4)), Some("D"));
    }

    #[test]
    fn test_no_slots_for_plain_command() {
        let template = compile_template("/bin/true").unwrap();
        let registry = ParamRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.display_slots(&template).is_empty());
    }
}
