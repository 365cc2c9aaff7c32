//! Structural metadata for discovered classes.
//!
//! A [`ClassInfo`] is a flat summary of one class: its name, direct supertypes,
//! modifiers, member descriptors and annotation references. Nothing here holds
//! executable content.

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the universal root type, never recorded as a superclass.
pub const OBJECT_CLASS: &str = "java.lang.Object";

bitflags! {
    /// Container-format-independent modifier set.
    ///
    /// Bit positions are our own; use the `from_*_access` constructors to
    /// translate raw class-file access flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ClassModifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const SYNCHRONIZED = 1 << 5;
        const VOLATILE = 1 << 6;
        const TRANSIENT = 1 << 7;
        const NATIVE = 1 << 8;
        const INTERFACE = 1 << 9;
        const ABSTRACT = 1 << 10;
        const STRICT = 1 << 11;
        const SYNTHETIC = 1 << 12;
        const ANNOTATION = 1 << 13;
        const ENUM = 1 << 14;
    }
}

/// Raw JVM access flag values.
pub mod access {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_SUPER: u16 = 0x0020;
    pub const ACC_SYNCHRONIZED: u16 = 0x0020;
    pub const ACC_VOLATILE: u16 = 0x0040;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_TRANSIENT: u16 = 0x0080;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_NATIVE: u16 = 0x0100;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_STRICT: u16 = 0x0800;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
    pub const ACC_ANNOTATION: u16 = 0x2000;
    pub const ACC_ENUM: u16 = 0x4000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessKind {
    Class,
    Field,
    Method,
}

impl ClassModifiers {
    pub fn from_class_access(flags: u16) -> Self {
        translate(flags, AccessKind::Class)
    }

    pub fn from_field_access(flags: u16) -> Self {
        translate(flags, AccessKind::Field)
    }

    pub fn from_method_access(flags: u16) -> Self {
        translate(flags, AccessKind::Method)
    }
}

fn translate(flags: u16, kind: AccessKind) -> ClassModifiers {
    use access::*;

    // 0x20, 0x40 and 0x80 mean different things depending on what carries them.
    let table: [(u16, ClassModifiers, bool); 15] = [
        (ACC_PUBLIC, ClassModifiers::PUBLIC, true),
        (ACC_PRIVATE, ClassModifiers::PRIVATE, true),
        (ACC_PROTECTED, ClassModifiers::PROTECTED, true),
        (ACC_STATIC, ClassModifiers::STATIC, true),
        (ACC_FINAL, ClassModifiers::FINAL, true),
        (
            ACC_SYNCHRONIZED,
            ClassModifiers::SYNCHRONIZED,
            kind == AccessKind::Method,
        ),
        (ACC_VOLATILE, ClassModifiers::VOLATILE, kind == AccessKind::Field),
        (ACC_TRANSIENT, ClassModifiers::TRANSIENT, kind == AccessKind::Field),
        (ACC_NATIVE, ClassModifiers::NATIVE, true),
        (ACC_INTERFACE, ClassModifiers::INTERFACE, true),
        (ACC_ABSTRACT, ClassModifiers::ABSTRACT, true),
        (ACC_STRICT, ClassModifiers::STRICT, true),
        (ACC_SYNTHETIC, ClassModifiers::SYNTHETIC, true),
        (ACC_ANNOTATION, ClassModifiers::ANNOTATION, true),
        (ACC_ENUM, ClassModifiers::ENUM, true),
    ];

    let mut modifiers = ClassModifiers::empty();
    for (bit, modifier, applies) in table {
        if applies && flags & bit != 0 {
            modifiers |= modifier;
        }
    }
    modifiers
}

/// Converts a slash-separated internal name (`java/util/List`) to its dotted form.
pub fn internal_to_external(internal: &str) -> String {
    internal.replace('/', ".")
}

/// A field declared by a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

impl FieldInfo {
    pub fn modifiers(&self) -> ClassModifiers {
        ClassModifiers::from_field_access(self.access)
    }
}

impl fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature.as_deref().unwrap_or(&self.name))
    }
}

/// A method declared by a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Dotted names of the declared thrown exceptions.
    pub exceptions: Vec<String>,
}

impl MethodInfo {
    pub fn modifiers(&self) -> ClassModifiers {
        ClassModifiers::from_method_access(self.access)
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature.as_deref().unwrap_or(&self.name))
    }
}

/// A class-level annotation reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AnnotationInfo {
    pub name: String,
    pub visible_at_runtime: bool,
}

impl AnnotationInfo {
    /// Builds an annotation reference from a type descriptor such as
    /// `Lcom/example/Marker;`.
    pub fn from_descriptor(descriptor: &str, visible_at_runtime: bool) -> Self {
        let internal = descriptor
            .strip_prefix('L')
            .and_then(|d| d.strip_suffix(';'))
            .unwrap_or(descriptor);
        Self {
            name: internal_to_external(internal),
            visible_at_runtime,
        }
    }
}

/// Structural summary of one class, keyed in the registry by [`ClassInfo::name`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassInfo {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    modifiers: ClassModifiers,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    annotations: Vec<AnnotationInfo>,
    location: PathBuf,
}

impl ClassInfo {
    /// Creates a record for the dotted class `name` found in `location`.
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            modifiers: ClassModifiers::empty(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            location: location.into(),
        }
    }

    /// Sets the direct superclass. [`OBJECT_CLASS`] is treated as "no superclass".
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        let superclass = superclass.into();
        self.superclass = (superclass != OBJECT_CLASS).then_some(superclass);
        self
    }

    pub fn with_interfaces<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces = interfaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_modifiers(mut self, modifiers: ClassModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInfo) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct superclass, or `None` when it is the universal root type.
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Directly declared interfaces, in declaration order.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn modifiers(&self) -> ClassModifiers {
        self.modifiers
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn annotations(&self) -> &[AnnotationInfo] {
        &self.annotations
    }

    /// The directory or archive the record was discovered in.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers.contains(ClassModifiers::INTERFACE)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(ClassModifiers::ABSTRACT)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

impl fmt::Display for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(ClassModifiers::PUBLIC) {
            f.write_str("public ")?;
        }
        if self.is_abstract() {
            f.write_str("abstract ")?;
        }
        if self.is_interface() {
            f.write_str("interface ")?;
        } else {
            f.write_str("class ")?;
        }
        f.write_str(&self.name)?;

        if !self.interfaces.is_empty() {
            f.write_str(" implements")?;
            for interface in &self.interfaces {
                write!(f, " {interface}")?;
            }
        }
        if let Some(superclass) = &self.superclass {
            write!(f, " extends {superclass}")?;
        }
        Ok(())
    }
}
