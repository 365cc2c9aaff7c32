//! Ancestor and interface closure over a finished [`ClassRegistry`].
//!
//! Names that are not in the registry (anything outside the search roots) end
//! that branch of the walk; they are not errors and never appear in a result.
//! Both walks track visited names, so a class that lists itself as an ancestor
//! still terminates.

use std::collections::{BTreeMap, HashSet};

use crate::info::ClassInfo;
use crate::registry::ClassRegistry;

/// Records keyed by class name.
pub type ClassSet<'a> = BTreeMap<&'a str, &'a ClassInfo>;

#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    fn lookup(&self, name: Option<&str>) -> Option<&'a ClassInfo> {
        name.and_then(|n| self.registry.get(n))
    }

    /// Every known ancestor of `class`, following superclass links.
    pub fn all_superclasses(&self, class: &ClassInfo) -> ClassSet<'a> {
        let mut found = ClassSet::new();
        let mut visited: HashSet<&str> = HashSet::from([class.name()]);

        let mut next = self.lookup(class.superclass());
        while let Some(superclass) = next {
            if !visited.insert(superclass.name()) {
                break;
            }
            found.insert(superclass.name(), superclass);
            next = self.lookup(superclass.superclass());
        }
        found
    }

    /// Every known interface `class` implements, directly, through its
    /// ancestors, or through interfaces extending other interfaces.
    pub fn all_interfaces(&self, class: &ClassInfo) -> ClassSet<'a> {
        let mut found = ClassSet::new();
        let mut expanded = HashSet::new();
        self.collect_interfaces(class, class.name(), &mut expanded, &mut found);
        found
    }

    fn collect_interfaces(
        &self,
        class: &ClassInfo,
        origin: &str,
        expanded: &mut HashSet<String>,
        found: &mut ClassSet<'a>,
    ) {
        if !expanded.insert(class.name().to_string()) {
            return;
        }

        if let Some(superclass) = self.lookup(class.superclass()) {
            self.collect_interfaces(superclass, origin, expanded, found);
        }

        for name in class.interfaces() {
            let Some(interface) = self.registry.get(name) else {
                continue;
            };
            if interface.name() != origin {
                found.insert(interface.name(), interface);
            }
            self.collect_interfaces(interface, origin, expanded, found);
        }
    }

    /// Whether `class` extends or implements `name`, transitively.
    pub fn is_subtype_of(&self, class: &ClassInfo, name: &str) -> bool {
        self.all_superclasses(class).contains_key(name)
            || self.all_interfaces(class).contains_key(name)
    }
}
