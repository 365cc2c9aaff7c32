//! Fixture helpers shared by unit tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use zip::write::FileOptions;

use crate::info::access::{ACC_PUBLIC, ACC_SUPER};

static COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "class_finder_test_{}_{}_{}_{}",
        std::process::id(),
        nanos,
        n,
        name
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes `bytes` as `<root>/<package path>/<Simple>.class`.
pub(crate) fn write_class(root: &Path, class_name: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(format!("{}.class", class_name.replace('.', "/")));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

pub(crate) fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
            continue;
        }
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

pub(crate) fn class_entry(class_name: &str) -> String {
    format!("{}.class", class_name.replace('.', "/"))
}

/// Encodes minimal but valid JVM class files.
pub(crate) struct ClassFileBuilder {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    access: u16,
    fields: Vec<(u16, String, String)>,
    methods: Vec<(u16, String, String, Vec<String>)>,
    annotations: Vec<(String, bool)>,
}

impl ClassFileBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            superclass: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            access: ACC_PUBLIC | ACC_SUPER,
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub(crate) fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub(crate) fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub(crate) fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub(crate) fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.fields
            .push((access, name.to_string(), descriptor.to_string()));
        self
    }

    pub(crate) fn method(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        exceptions: &[&str],
    ) -> Self {
        self.methods.push((
            access,
            name.to_string(),
            descriptor.to_string(),
            exceptions.iter().map(|e| e.to_string()).collect(),
        ));
        self
    }

    pub(crate) fn annotation(mut self, name: &str, visible: bool) -> Self {
        self.annotations.push((name.to_string(), visible));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this_class = pool.class(&self.name);
        let super_class = self.superclass.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        // A double-slot constant keeps the pool indexing honest.
        pool.long(42);

        let mut body = Vec::new();
        put_u16(&mut body, self.access);
        put_u16(&mut body, this_class);
        put_u16(&mut body, super_class);
        put_u16(&mut body, interfaces.len() as u16);
        for i in interfaces {
            put_u16(&mut body, i);
        }

        put_u16(&mut body, self.fields.len() as u16);
        for (access, name, descriptor) in &self.fields {
            put_u16(&mut body, *access);
            put_u16(&mut body, pool.utf8(name));
            put_u16(&mut body, pool.utf8(descriptor));
            put_u16(&mut body, 0);
        }

        put_u16(&mut body, self.methods.len() as u16);
        for (access, name, descriptor, exceptions) in &self.methods {
            put_u16(&mut body, *access);
            put_u16(&mut body, pool.utf8(name));
            put_u16(&mut body, pool.utf8(descriptor));
            if exceptions.is_empty() {
                put_u16(&mut body, 0);
                continue;
            }
            put_u16(&mut body, 1);
            put_u16(&mut body, pool.utf8("Exceptions"));
            put_u32(&mut body, 2 + 2 * exceptions.len() as u32);
            put_u16(&mut body, exceptions.len() as u16);
            for e in exceptions {
                let idx = pool.class(e);
                put_u16(&mut body, idx);
            }
        }

        let visible: Vec<&String> = self.annotations.iter().filter(|a| a.1).map(|a| &a.0).collect();
        let invisible: Vec<&String> =
            self.annotations.iter().filter(|a| !a.1).map(|a| &a.0).collect();
        let mut attributes = Vec::new();
        if !visible.is_empty() {
            attributes.push(("RuntimeVisibleAnnotations", visible));
        }
        if !invisible.is_empty() {
            attributes.push(("RuntimeInvisibleAnnotations", invisible));
        }

        put_u16(&mut body, attributes.len() as u16);
        for (attr_name, names) in attributes {
            let mut attr = Vec::new();
            put_u16(&mut attr, names.len() as u16);
            for name in names {
                put_u16(&mut attr, pool.utf8(&format!("L{};", name.replace('.', "/"))));
                // One `value = "x"` pair so element values get skipped.
                put_u16(&mut attr, 1);
                put_u16(&mut attr, pool.utf8("value"));
                attr.push(b's');
                put_u16(&mut attr, pool.utf8("x"));
            }
            put_u16(&mut body, pool.utf8(attr_name));
            put_u32(&mut body, attr.len() as u32);
            body.extend_from_slice(&attr);
        }

        let mut out = Vec::new();
        put_u32(&mut out, 0xCAFE_BABE);
        put_u16(&mut out, 0);
        put_u16(&mut out, 52);
        put_u16(&mut out, pool.next_index);
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

struct Pool {
    bytes: Vec<u8>,
    next_index: u16,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
        }
    }
}

impl Pool {
    fn utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(1);
        put_u16(&mut self.bytes, s.len() as u16);
        self.bytes.extend_from_slice(s.as_bytes());
        self.bump(1)
    }

    fn class(&mut self, dotted: &str) -> u16 {
        let name = self.utf8(&dotted.replace('.', "/"));
        self.bytes.push(7);
        put_u16(&mut self.bytes, name);
        self.bump(1)
    }

    fn long(&mut self, value: i64) -> u16 {
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.bump(2)
    }

    fn bump(&mut self, slots: u16) -> u16 {
        let index = self.next_index;
        self.next_index += slots;
        index
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}
