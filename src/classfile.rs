//! Class-file decoding.
//!
//! The loader only talks to [`ClassFileReader`]; [`BytecodeReader`] is the
//! default implementation and decodes just enough of the JVM class-file format to
//! build a [`ClassInfo`]: names, supertypes, access flags, member descriptors and
//! class-level annotations. Code attributes are skipped unread.

use std::io::Read;
use std::path::Path;

use crate::error::{FinderError, Result};
use crate::info::{AnnotationInfo, ClassInfo, ClassModifiers, FieldInfo, MethodInfo};
use crate::info::internal_to_external;

const MAGIC: u32 = 0xCAFE_BABE;
const MAX_ELEMENT_DEPTH: usize = 64;

/// Decodes one class-file blob into a [`ClassInfo`].
///
/// Implementations must fail with [`FinderError::UnreadableRecord`] on malformed
/// input rather than panic; the loader skips such files and carries on.
pub trait ClassFileReader: Send + Sync {
    fn read_class(&self, input: &mut dyn Read, location: &Path) -> Result<ClassInfo>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BytecodeReader;

impl ClassFileReader for BytecodeReader {
    fn read_class(&self, input: &mut dyn Read, location: &Path) -> Result<ClassInfo> {
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|err| FinderError::unreadable(format!("failed to read record: {err}")))?;
        parse_class(&bytes, location)
    }
}

pub fn parse_class(bytes: &[u8], location: &Path) -> Result<ClassInfo> {
    let mut input = ByteInput::new(bytes);

    let magic = input.u32()?;
    if magic != MAGIC {
        return Err(FinderError::unreadable(format!("bad magic 0x{magic:08X}")));
    }
    let _minor = input.u16()?;
    let _major = input.u16()?;

    let pool = ConstantPool::parse(&mut input)?;

    let access = input.u16()?;
    let this_class = input.u16()?;
    let super_class = input.u16()?;

    let mut info = ClassInfo::new(pool.class_name(this_class)?, location)
        .with_modifiers(ClassModifiers::from_class_access(access));
    if super_class != 0 {
        info = info.with_superclass(pool.class_name(super_class)?);
    }

    let interface_count = input.u16()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        interfaces.push(pool.class_name(input.u16()?)?);
    }
    info = info.with_interfaces(interfaces);

    for _ in 0..input.u16()? {
        info = info.with_field(parse_field(&mut input, &pool)?);
    }
    for _ in 0..input.u16()? {
        info = info.with_method(parse_method(&mut input, &pool)?);
    }

    for _ in 0..input.u16()? {
        let (name, body) = read_attribute(&mut input, &pool)?;
        let visible = match name {
            "RuntimeVisibleAnnotations" => true,
            "RuntimeInvisibleAnnotations" => false,
            _ => continue,
        };
        for annotation in parse_annotations(body, &pool, visible)? {
            info = info.with_annotation(annotation);
        }
    }

    Ok(info)
}

fn parse_field(input: &mut ByteInput<'_>, pool: &ConstantPool) -> Result<FieldInfo> {
    let access = input.u16()?;
    let name = pool.utf8(input.u16()?)?.to_string();
    let descriptor = pool.utf8(input.u16()?)?.to_string();
    let mut signature = None;

    for _ in 0..input.u16()? {
        let (attr, body) = read_attribute(input, pool)?;
        if attr == "Signature" {
            signature = Some(read_signature(body, pool)?);
        }
    }

    Ok(FieldInfo {
        access,
        name,
        descriptor,
        signature,
    })
}

fn parse_method(input: &mut ByteInput<'_>, pool: &ConstantPool) -> Result<MethodInfo> {
    let access = input.u16()?;
    let name = pool.utf8(input.u16()?)?.to_string();
    let descriptor = pool.utf8(input.u16()?)?.to_string();
    let mut signature = None;
    let mut exceptions = Vec::new();

    for _ in 0..input.u16()? {
        let (attr, body) = read_attribute(input, pool)?;
        match attr {
            "Signature" => signature = Some(read_signature(body, pool)?),
            "Exceptions" => {
                let mut body = ByteInput::new(body);
                for _ in 0..body.u16()? {
                    exceptions.push(pool.class_name(body.u16()?)?);
                }
            }
            _ => {}
        }
    }

    Ok(MethodInfo {
        access,
        name,
        descriptor,
        signature,
        exceptions,
    })
}

fn read_attribute<'d, 'p>(
    input: &mut ByteInput<'d>,
    pool: &'p ConstantPool,
) -> Result<(&'p str, &'d [u8])> {
    let name = pool.utf8(input.u16()?)?;
    let len = input.u32()? as usize;
    Ok((name, input.take(len)?))
}

fn read_signature(body: &[u8], pool: &ConstantPool) -> Result<String> {
    let mut body = ByteInput::new(body);
    Ok(pool.utf8(body.u16()?)?.to_string())
}

fn parse_annotations(
    body: &[u8],
    pool: &ConstantPool,
    visible: bool,
) -> Result<Vec<AnnotationInfo>> {
    let mut body = ByteInput::new(body);
    let count = body.u16()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let descriptor = skip_annotation(&mut body, pool, 0)?;
        annotations.push(AnnotationInfo::from_descriptor(descriptor, visible));
    }
    Ok(annotations)
}

/// Consumes one `annotation` structure and returns its type descriptor.
fn skip_annotation<'a>(
    input: &mut ByteInput<'_>,
    pool: &'a ConstantPool,
    depth: usize,
) -> Result<&'a str> {
    let descriptor = pool.utf8(input.u16()?)?;
    for _ in 0..input.u16()? {
        let _element_name = input.u16()?;
        skip_element_value(input, pool, depth + 1)?;
    }
    Ok(descriptor)
}

fn skip_element_value(input: &mut ByteInput<'_>, pool: &ConstantPool, depth: usize) -> Result<()> {
    if depth > MAX_ELEMENT_DEPTH {
        return Err(FinderError::unreadable("annotation values nested too deeply"));
    }
    match input.u8()? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            input.u16()?;
        }
        b'e' => {
            input.u16()?;
            input.u16()?;
        }
        b'@' => {
            skip_annotation(input, pool, depth)?;
        }
        b'[' => {
            for _ in 0..input.u16()? {
                skip_element_value(input, pool, depth + 1)?;
            }
        }
        tag => {
            return Err(FinderError::unreadable(format!(
                "unknown element value tag {:?}",
                tag as char
            )));
        }
    }
    Ok(())
}

enum Constant {
    Unusable,
    Utf8(String),
    Class(u16),
    Other,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(input: &mut ByteInput<'_>) -> Result<Self> {
        let count = input.u16()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let tag = input.u8()?;
            let constant = match tag {
                1 => {
                    let len = input.u16()? as usize;
                    Constant::Utf8(String::from_utf8_lossy(input.take(len)?).into_owned())
                }
                7 => Constant::Class(input.u16()?),
                8 | 16 | 19 | 20 => {
                    input.skip(2)?;
                    Constant::Other
                }
                15 => {
                    input.skip(3)?;
                    Constant::Other
                }
                3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                    input.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    input.skip(8)?;
                    // Long and Double occupy two slots.
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                other => {
                    return Err(FinderError::unreadable(format!(
                        "unknown constant pool tag {other} at entry {}",
                        entries.len()
                    )));
                }
            };
            entries.push(constant);
        }

        Ok(Self { entries })
    }

    fn utf8(&self, index: u16) -> Result<&str> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(FinderError::unreadable(format!(
                "constant {index} is not a Utf8 entry"
            ))),
        }
    }

    fn class_name(&self, index: u16) -> Result<String> {
        match self.entries.get(index as usize) {
            Some(Constant::Class(name_index)) => Ok(internal_to_external(self.utf8(*name_index)?)),
            _ => Err(FinderError::unreadable(format!(
                "constant {index} is not a Class entry"
            ))),
        }
    }
}

struct ByteInput<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteInput<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                FinderError::unreadable(format!(
                    "truncated record: wanted {len} bytes at offset {}",
                    self.pos
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
