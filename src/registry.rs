use dashmap::DashMap;
use dashmap::ReadOnlyView;
use std::sync::Arc;

use crate::info::ClassInfo;

/// Concurrently writable class namespace used while ingestion runs.
///
/// Each insert is atomic per key. When two roots provide the same class name the
/// write that lands last wins; no conflict is reported and no merge happens.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    classes: DashMap<String, Arc<ClassInfo>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `info` under its name, returning the record it replaced.
    pub fn insert(&self, info: ClassInfo) -> Option<Arc<ClassInfo>> {
        self.classes.insert(info.name().to_string(), Arc::new(info))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Freezes the namespace once every writer is done.
    pub fn finish(self) -> ClassRegistry {
        ClassRegistry {
            classes: self.classes.into_read_only(),
        }
    }
}

/// Read-only mapping from class name to record for one discovery run.
pub struct ClassRegistry {
    classes: ReadOnlyView<String, Arc<ClassInfo>>,
}

impl ClassRegistry {
    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Every record, in the registry's iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassInfo>> + '_ {
        self.classes.values()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        RegistryBuilder::new().finish()
    }
}

impl FromIterator<ClassInfo> for ClassRegistry {
    fn from_iter<T: IntoIterator<Item = ClassInfo>>(iter: T) -> Self {
        let builder = RegistryBuilder::new();
        for info in iter {
            builder.insert(info);
        }
        builder.finish()
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes.len())
            .finish()
    }
}
