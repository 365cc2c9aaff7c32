#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use zip::write::FileOptions;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;

static COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "class_finder_it_{}_{}_{}_{}",
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed),
        name
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_class(root: &Path, bytes: &[u8], class_name: &str) -> anyhow::Result<()> {
    let path = root.join(class_entry(class_name));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn class_entry(class_name: &str) -> String {
    format!("{}.class", class_name.replace('.', "/"))
}

pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(())
}

/// Encodes a class file with no members: just access flags, name, superclass
/// and interfaces.
pub fn class_bytes(name: &str, access: u16, superclass: Option<&str>, interfaces: &[&str]) -> Vec<u8> {
    let mut pool = Vec::new();
    let mut count: u16 = 1;
    let mut class_ref = |pool: &mut Vec<u8>, dotted: &str| -> u16 {
        let internal = dotted.replace('.', "/");
        pool.push(1);
        pool.extend_from_slice(&(internal.len() as u16).to_be_bytes());
        pool.extend_from_slice(internal.as_bytes());
        pool.push(7);
        pool.extend_from_slice(&count.to_be_bytes());
        count += 2;
        count - 1
    };

    let this_class = class_ref(&mut pool, name);
    let super_class = class_ref(&mut pool, superclass.unwrap_or("java.lang.Object"));
    let interface_refs: Vec<u16> = interfaces.iter().map(|i| class_ref(&mut pool, i)).collect();

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&52u16.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&pool);
    out.extend_from_slice(&access.to_be_bytes());
    out.extend_from_slice(&this_class.to_be_bytes());
    out.extend_from_slice(&super_class.to_be_bytes());
    out.extend_from_slice(&(interface_refs.len() as u16).to_be_bytes());
    for i in interface_refs {
        out.extend_from_slice(&i.to_be_bytes());
    }
    // No fields, methods or attributes.
    out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    out
}

/// Lays out the standard fixture: four classes in `dir/classes` plus one more
/// in `dir/classes/lib/extra.jar`.
pub fn standard_fixture(dir: &Path) -> anyhow::Result<PathBuf> {
    let classes = dir.join("classes");
    write_class(
        &classes,
        &class_bytes("demo.SomeInterface", ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT, None, &[]),
        "demo.SomeInterface",
    )?;
    write_class(
        &classes,
        &class_bytes(
            "demo.AbstractClass",
            ACC_PUBLIC | ACC_SUPER | ACC_ABSTRACT,
            None,
            &["demo.SomeInterface"],
        ),
        "demo.AbstractClass",
    )?;
    write_class(
        &classes,
        &class_bytes("demo.ConcreteClass", ACC_PUBLIC | ACC_SUPER, Some("demo.AbstractClass"), &[]),
        "demo.ConcreteClass",
    )?;
    write_class(
        &classes,
        &class_bytes("demo.TestClass1", ACC_PUBLIC | ACC_SUPER, None, &[]),
        "demo.TestClass1",
    )?;
    write_jar(
        &classes.join("lib/extra.jar"),
        &[(
            class_entry("demo.SomeInterfaceImpl").as_str(),
            class_bytes(
                "demo.SomeInterfaceImpl",
                ACC_PUBLIC | ACC_SUPER | ACC_FINAL,
                None,
                &["demo.SomeInterface"],
            )
            .as_slice(),
        )],
    )?;
    Ok(classes)
}
