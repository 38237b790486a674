//! The constant pool: decoding, and the accessors the rest of the decoder uses to resolve
//! indices into it.

use crate::io::ByteSource;
use crate::jvm::parsing::ParseError;

/// One slot of the constant pool.
///
/// `Long` and `Double` entries occupy two slots in the class file's numbering (JVM spec §4.4.5);
/// [`ConstantPool`] hides that by tracking which indices are "the upper half of a wide entry"
/// internally rather than exposing a variant for it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    /// `CONSTANT_Utf8`, already decoded from modified UTF-8 / CESU-8.
    Utf8(String),
    /// `CONSTANT_Integer`.
    Integer(i32),
    /// `CONSTANT_Float`.
    Float(f32),
    /// `CONSTANT_Long`.
    Long(i64),
    /// `CONSTANT_Double`.
    Double(f64),
    /// `CONSTANT_Class`.
    Class {
        /// Index of a `Utf8` entry holding the internal (slash-separated) name.
        name_index: u16,
    },
    /// `CONSTANT_String`.
    String {
        /// Index of the referenced `Utf8` entry.
        string_index: u16,
    },
    /// `CONSTANT_Fieldref`.
    FieldRef {
        /// Index of the declaring `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// `CONSTANT_Methodref`.
    MethodRef {
        /// Index of the declaring `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// `CONSTANT_InterfaceMethodref`.
    InterfaceMethodRef {
        /// Index of the declaring `Class` entry.
        class_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// `CONSTANT_NameAndType`.
    NameAndType {
        /// Index of a `Utf8` entry holding the simple name.
        name_index: u16,
        /// Index of a `Utf8` entry holding the descriptor.
        descriptor_index: u16,
    },
    /// `CONSTANT_MethodHandle`.
    MethodHandle {
        /// The reference kind, `1..=9` (JVM spec Table 4.4.8-A).
        reference_kind: u8,
        /// Index of the referenced `Fieldref`/`Methodref`/`InterfaceMethodref`.
        reference_index: u16,
    },
    /// `CONSTANT_MethodType`.
    MethodType {
        /// Index of a `Utf8` entry holding the method descriptor.
        descriptor_index: u16,
    },
    /// `CONSTANT_Dynamic`.
    Dynamic {
        /// Index into the class's `BootstrapMethods` attribute.
        bootstrap_method_attr_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// `CONSTANT_InvokeDynamic`.
    InvokeDynamic {
        /// Index into the class's `BootstrapMethods` attribute.
        bootstrap_method_attr_index: u16,
        /// Index of the `NameAndType` entry.
        name_and_type_index: u16,
    },
    /// `CONSTANT_Module`.
    Module {
        /// Index of a `Utf8` entry holding the module name.
        name_index: u16,
    },
    /// `CONSTANT_Package`.
    Package {
        /// Index of a `Utf8` entry holding the package name.
        name_index: u16,
    },
}

impl ConstantPoolEntry {
    fn width(&self) -> usize {
        match self {
            Self::Long(_) | Self::Double(_) => 2,
            _ => 1,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class { .. } => "Class",
            Self::String { .. } => "String",
            Self::FieldRef { .. } => "Fieldref",
            Self::MethodRef { .. } => "Methodref",
            Self::InterfaceMethodRef { .. } => "InterfaceMethodref",
            Self::NameAndType { .. } => "NameAndType",
            Self::MethodHandle { .. } => "MethodHandle",
            Self::MethodType { .. } => "MethodType",
            Self::Dynamic { .. } => "Dynamic",
            Self::InvokeDynamic { .. } => "InvokeDynamic",
            Self::Module { .. } => "Module",
            Self::Package { .. } => "Package",
        }
    }

    fn parse(tag: u8, source: &mut ByteSource) -> Result<Self, ParseError> {
        let entry = match tag {
            1 => {
                let length = source.read_u16()? as usize;
                let bytes = source.read_n(length)?;
                let text = cesu8::from_java_cesu8(&bytes)
                    .map_err(|_| ParseError::MalformedModifiedUtf8)?;
                Self::Utf8(text.into_owned())
            }
            3 => Self::Integer(source.read_u32()? as i32),
            4 => Self::Float(f32::from_bits(source.read_u32()?)),
            5 => {
                let high = source.read_u32()? as u64;
                let low = source.read_u32()? as u64;
                Self::Long(((high << 32) | low) as i64)
            }
            6 => {
                let high = source.read_u32()? as u64;
                let low = source.read_u32()? as u64;
                Self::Double(f64::from_bits((high << 32) | low))
            }
            7 => Self::Class {
                name_index: source.read_u16()?,
            },
            8 => Self::String {
                string_index: source.read_u16()?,
            },
            9 => Self::FieldRef {
                class_index: source.read_u16()?,
                name_and_type_index: source.read_u16()?,
            },
            10 => Self::MethodRef {
                class_index: source.read_u16()?,
                name_and_type_index: source.read_u16()?,
            },
            11 => Self::InterfaceMethodRef {
                class_index: source.read_u16()?,
                name_and_type_index: source.read_u16()?,
            },
            12 => Self::NameAndType {
                name_index: source.read_u16()?,
                descriptor_index: source.read_u16()?,
            },
            15 => Self::MethodHandle {
                reference_kind: source.read_u8()?,
                reference_index: source.read_u16()?,
            },
            16 => Self::MethodType {
                descriptor_index: source.read_u16()?,
            },
            17 => Self::Dynamic {
                bootstrap_method_attr_index: source.read_u16()?,
                name_and_type_index: source.read_u16()?,
            },
            18 => Self::InvokeDynamic {
                bootstrap_method_attr_index: source.read_u16()?,
                name_and_type_index: source.read_u16()?,
            },
            19 => Self::Module {
                name_index: source.read_u16()?,
            },
            20 => Self::Package {
                name_index: source.read_u16()?,
            },
            other => return Err(ParseError::InvalidConstantPoolTag(other)),
        };
        Ok(entry)
    }
}

/// The decoded constant pool of a class file, indexable by the 1-based indices the rest of the
/// class file's structures use.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    // Slot 0 is always `None`. The slot immediately following a `Long`/`Double` entry is also
    // `None`, per the JVM spec's "occupies two entries" rule.
    slots: Vec<Option<ConstantPoolEntry>>,
}

impl ConstantPool {
    /// Decodes `constant_pool_count - 1` entries from `source`.
    pub fn parse(source: &mut ByteSource) -> Result<Self, ParseError> {
        let count = source.read_u16()? as usize;
        let mut slots: Vec<Option<ConstantPoolEntry>> = Vec::with_capacity(count);
        slots.push(None);
        while slots.len() < count {
            let tag = source.read_u8()?;
            let entry = ConstantPoolEntry::parse(tag, source)?;
            let width = entry.width();
            slots.push(Some(entry));
            if width == 2 {
                slots.push(None);
            }
        }
        Ok(Self { slots })
    }

    /// Looks up the raw entry at `index`.
    pub fn get_entry(&self, index: u16) -> Result<&ConstantPoolEntry, ParseError> {
        self.slots
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(ParseError::InvalidConstantPoolIndex(index))
    }

    fn expect<'a, T>(
        &'a self,
        index: u16,
        expected: &'static str,
        project: impl FnOnce(&'a ConstantPoolEntry) -> Option<T>,
    ) -> Result<T, ParseError> {
        let entry = self.get_entry(index)?;
        project(entry).ok_or_else(|| ParseError::ConstantPoolEntryMismatch { index, expected })
    }

    /// Resolves a `Utf8` entry to its string.
    pub fn get_str(&self, index: u16) -> Result<&str, ParseError> {
        self.expect(index, "Utf8", |e| match e {
            ConstantPoolEntry::Utf8(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Resolves a `Class` entry to its internal (slash-separated) name.
    pub fn get_class_internal_name(&self, index: u16) -> Result<&str, ParseError> {
        let name_index = self.expect(index, "Class", |e| match e {
            ConstantPoolEntry::Class { name_index } => Some(*name_index),
            _ => None,
        })?;
        self.get_str(name_index)
    }

    /// Resolves a `NameAndType` entry to its `(name, descriptor)` pair.
    pub fn get_name_and_type(&self, index: u16) -> Result<(&str, &str), ParseError> {
        let (name_index, descriptor_index) = self.expect(index, "NameAndType", |e| match e {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Some((*name_index, *descriptor_index)),
            _ => None,
        })?;
        Ok((self.get_str(name_index)?, self.get_str(descriptor_index)?))
    }

    /// Resolves a literal constant referenced by a `ConstantValue` attribute: an `Integer`,
    /// `Float`, `Long`, `Double` or `String` entry.
    pub fn get_constant_value(&self, index: u16) -> Result<crate::jvm::fact::ConstantValue, ParseError> {
        use crate::jvm::fact::ConstantValue;
        match self.get_entry(index)? {
            ConstantPoolEntry::Integer(v) => Ok(ConstantValue::Integer(*v)),
            ConstantPoolEntry::Float(v) => Ok(ConstantValue::Float(*v)),
            ConstantPoolEntry::Long(v) => Ok(ConstantValue::Long(*v)),
            ConstantPoolEntry::Double(v) => Ok(ConstantValue::Double(*v)),
            ConstantPoolEntry::String { string_index } => {
                Ok(ConstantValue::String(self.get_str(*string_index)?.to_owned()))
            }
            _ => Err(ParseError::ConstantPoolEntryMismatch {
                index,
                expected: "Integer, Float, Long, Double or String",
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn kind_name_of(&self, index: u16) -> Result<&'static str, ParseError> {
        self.get_entry(index).map(ConstantPoolEntry::kind_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_bytes(entries: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(entries);
        bytes
    }

    #[test]
    fn parses_utf8_and_class_entry() {
        // constant_pool_count = 3: #1 Utf8 "A", #2 Class -> #1
        let mut bytes = vec![0x00, 0x03];
        bytes.extend(pool_bytes(&[1, 0x00, 0x01, b'A']));
        bytes.extend(pool_bytes(&[7, 0x00, 0x01]));
        let mut source = ByteSource::from_bytes(bytes);
        let pool = ConstantPool::parse(&mut source).unwrap();
        assert_eq!(pool.get_str(1).unwrap(), "A");
        assert_eq!(pool.get_class_internal_name(2).unwrap(), "A");
    }

    #[test]
    fn long_entry_occupies_two_slots() {
        // constant_pool_count = 3: #1 Long, #2 is the unusable upper half, next real entry is #3.
        let mut bytes = vec![0x00, 0x04];
        bytes.extend(pool_bytes(&[5, 0, 0, 0, 0, 0, 0, 0, 1]));
        bytes.extend(pool_bytes(&[1, 0x00, 0x01, b'Z']));
        let mut source = ByteSource::from_bytes(bytes);
        let pool = ConstantPool::parse(&mut source).unwrap();
        assert!(matches!(pool.get_entry(2), Err(ParseError::InvalidConstantPoolIndex(2))));
        assert_eq!(pool.get_str(3).unwrap(), "Z");
    }

    #[test]
    fn index_zero_is_always_invalid() {
        let mut source = ByteSource::from_bytes(vec![0x00, 0x01]);
        let pool = ConstantPool::parse(&mut source).unwrap();
        assert!(matches!(pool.get_entry(0), Err(ParseError::InvalidConstantPoolIndex(0))));
    }

    #[test]
    fn unrecognized_tag_is_rejected() {
        let mut bytes = vec![0x00, 0x02];
        bytes.extend(pool_bytes(&[99]));
        let mut source = ByteSource::from_bytes(bytes);
        assert!(matches!(
            ConstantPool::parse(&mut source),
            Err(ParseError::InvalidConstantPoolTag(99))
        ));
    }
}
