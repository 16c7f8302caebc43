//! Class Table
//!
//! Maps label class names to the dense integer ids used by normalized label
//! files. One table is built per batch and written to `classes.json` as a
//! JSON array whose index is the id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, UiClass};
use crate::config::ConfigError;
use crate::scene::UiFamily;

/// How the batch class table is built
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassPolicy {
    /// Fixed per-family enumeration, independent of what was generated
    #[default]
    Predefined,
    /// Ids assigned in order of first appearance across the batch
    FirstSeen,
}

impl ClassPolicy {
    /// Parse `predefined` or `first-seen`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "predefined" => Ok(Self::Predefined),
            "first-seen" | "first_seen" => Ok(Self::FirstSeen),
            other => Err(ConfigError::Invalid {
                key: "class_policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Ordered class name to id mapping
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassTable {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl ClassTable {
    /// Assign ids in first-seen order, ignoring repeats
    #[must_use]
    pub fn first_seen<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for name in names {
            table.insert(name.as_ref());
        }
        table
    }

    /// The fixed class enumeration of a UI family
    #[must_use]
    pub fn predefined(family: UiFamily) -> Self {
        Self::first_seen(family.classes().iter().map(|class| class.as_str()))
    }

    /// Build the batch table from every image's surviving annotations
    ///
    /// `images` must be in job order so first-seen ids do not depend on
    /// which image finished first.
    #[must_use]
    pub fn build<'a, I>(policy: ClassPolicy, family: UiFamily, images: I) -> Self
    where
        I: IntoIterator<Item = &'a [Annotation]>,
    {
        match policy {
            ClassPolicy::Predefined => Self::predefined(family),
            ClassPolicy::FirstSeen => Self::first_seen(
                images
                    .into_iter()
                    .flat_map(|annotations| annotations.iter().map(|a| a.class.as_str())),
            ),
        }
    }

    fn insert(&mut self, name: &str) {
        if !self.ids.contains_key(name) {
            self.ids.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }

    /// Id of a class name
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Id of a label class
    #[must_use]
    pub fn id_of_class(&self, class: UiClass) -> Option<usize> {
        self.id_of(class.as_str())
    }

    /// Class names, index = id
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no class has been assigned an id
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `classes.json` contents
    ///
    /// # Errors
    ///
    /// Propagates serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.names)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotation::layers;
    use crate::geometry::Rect;

    #[test]
    fn test_first_seen_ignores_repeats() {
        let table = ClassTable::first_seen(["app", "dock", "app"]);
        assert_eq!(table.names(), ["app".to_string(), "dock".to_string()]);
        assert_eq!(table.id_of("app"), Some(0));
        assert_eq!(table.id_of("dock"), Some(1));
        assert_eq!(table.id_of("menubar"), None);
        assert_eq!(table.to_json().unwrap(), r#"["app","dock"]"#);
    }

    #[test]
    fn test_build_first_seen_follows_job_order() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let first = vec![Annotation::new(layers::DOCK, UiClass::Dock, rect)];
        let second = vec![
            Annotation::new(layers::APPLICATION, UiClass::Application, rect),
            Annotation::new(layers::DOCK, UiClass::Dock, rect),
        ];

        let table = ClassTable::build(
            ClassPolicy::FirstSeen,
            UiFamily::Mac,
            [first.as_slice(), second.as_slice()],
        );

        assert_eq!(table.names(), ["dock".to_string(), "application".to_string()]);
    }

    #[test]
    fn test_predefined_ignores_annotations() {
        let table = ClassTable::build(
            ClassPolicy::Predefined,
            UiFamily::Windows,
            std::iter::empty::<&[Annotation]>(),
        );
        assert_eq!(table, ClassTable::predefined(UiFamily::Windows));
        assert!(table.id_of_class(UiClass::TaskBar).is_some());
        assert!(table.id_of_class(UiClass::MenuBar).is_none());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(ClassPolicy::parse("predefined").unwrap(), ClassPolicy::Predefined);
        assert_eq!(ClassPolicy::parse("First-Seen").unwrap(), ClassPolicy::FirstSeen);
        assert!(matches!(
            ClassPolicy::parse("alphabetical"),
            Err(ConfigError::Invalid { key: "class_policy", .. })
        ));
    }
}
