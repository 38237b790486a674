//! Attribute decoding: reading the raw `attribute_info` table, then decoding the handful of
//! attribute kinds this crate's facts actually carry.

use crate::io::ByteSource;
use crate::jvm::annotation::{Annotation, ElementValue};
use crate::jvm::constant_pool::ConstantPool;
use crate::jvm::fact::{ConstantValue, EnclosingMethodFact, InnerClassFact};
use crate::jvm::access_flags::{NestedClassAccessFlags, ParameterAccessFlags};
use crate::jvm::parsing::errors::ParseError;

/// Checks that a sub-decoder consumed exactly as many bytes as the attribute declared, catching a
/// self-describing count field (e.g. a leading `*_count`) that doesn't account for the whole of
/// `info`. Only meaningful for in-memory sources, which `ByteSource::from_bytes` always is here.
fn expect_fully_consumed(name: &'static str, info: &[u8], source: &ByteSource) -> Result<(), ParseError> {
    let consumed = source.position().unwrap_or(info.len() as u64);
    if consumed != info.len() as u64 {
        return Err(ParseError::AttributeLengthMismatch {
            name: name.to_owned(),
            declared: info.len() as u32,
            consumed: consumed as u32,
        });
    }
    Ok(())
}

/// One undecoded `attribute_info` entry: a name (already resolved) and its raw `info` bytes.
#[derive(Debug, Clone)]
pub struct RawAttribute {
    /// The attribute's name, e.g. `"Signature"`.
    pub name: String,
    /// The attribute's `info` bytes, exactly `attribute_length` long.
    pub info: Vec<u8>,
}

/// Reads an `attributes_count`-prefixed table of raw attributes.
pub fn read_raw_attributes(
    source: &mut ByteSource,
    pool: &ConstantPool,
) -> Result<Vec<RawAttribute>, ParseError> {
    let count = source.read_u16()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = source.read_u16()?;
        let name = pool.get_str(name_index)?.to_owned();
        let length = source.read_u32()?;
        let info = source.read_n(length as usize)?;
        attributes.push(RawAttribute { name, info });
    }
    Ok(attributes)
}

/// Pops the first (and, per the caller's expectation, only) attribute named `name`, erroring if
/// a second one is found.
pub fn take_single<'a>(
    raws: &mut Vec<RawAttribute>,
    name: &'static str,
) -> Result<Option<RawAttribute>, ParseError> {
    let mut found = None;
    let mut remaining = Vec::with_capacity(raws.len());
    for raw in raws.drain(..) {
        if raw.name == name {
            if found.replace(raw).is_some() {
                return Err(ParseError::DuplicateAttribute(name));
            }
        } else {
            remaining.push(raw);
        }
    }
    *raws = remaining;
    Ok(found)
}

/// Resolves a `ConstantValue` attribute's `info` bytes to the literal it names.
pub fn decode_constant_value(
    info: &[u8],
    pool: &ConstantPool,
) -> Result<ConstantValue, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let index = source.read_u16()?;
    pool.get_constant_value(index)
}

/// Resolves an `Exceptions` attribute's `info` bytes to the dotted names of the declared checked
/// exceptions.
pub fn decode_exceptions(info: &[u8], pool: &ConstantPool) -> Result<Vec<String>, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let count = source.read_u16()?;
    let mut names = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let index = source.read_u16()?;
        let internal = pool.get_class_internal_name(index)?;
        names.push(internal.replace('/', "."));
    }
    Ok(names)
}

/// Resolves a `MethodParameters` attribute's `info` bytes to `(name, access flags)` pairs, in
/// parameter order. Annotations are merged in separately from the parameter-annotation
/// attributes.
pub fn decode_method_parameters(
    info: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<(Option<String>, ParameterAccessFlags)>, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let count = source.read_u8()?;
    let mut parameters = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = source.read_u16()?;
        let name = if name_index == 0 {
            None
        } else {
            Some(pool.get_str(name_index)?.to_owned())
        };
        let access_flags = ParameterAccessFlags::from_bits_truncate(source.read_u16()?);
        parameters.push((name, access_flags));
    }
    expect_fully_consumed("MethodParameters", info, &source)?;
    Ok(parameters)
}

/// Resolves an `EnclosingMethod` attribute's `info` bytes.
pub fn decode_enclosing_method(
    info: &[u8],
    pool: &ConstantPool,
) -> Result<EnclosingMethodFact, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let class_index = source.read_u16()?;
    let class_name = pool.get_class_internal_name(class_index)?.replace('/', ".");
    let method_index = source.read_u16()?;
    let (method_name, method_descriptor) = if method_index == 0 {
        (None, None)
    } else {
        let (name, descriptor) = pool.get_name_and_type(method_index)?;
        (Some(name.to_owned()), Some(descriptor.to_owned()))
    };
    expect_fully_consumed("EnclosingMethod", info, &source)?;
    Ok(EnclosingMethodFact {
        class_name,
        method_name,
        method_descriptor,
    })
}

/// Resolves an `InnerClasses` attribute's `info` bytes.
pub fn decode_inner_classes(info: &[u8], pool: &ConstantPool) -> Result<Vec<InnerClassFact>, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let count = source.read_u16()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let inner_class_index = source.read_u16()?;
        let inner_name = pool.get_class_internal_name(inner_class_index)?.replace('/', ".");
        let outer_class_index = source.read_u16()?;
        let outer_name = if outer_class_index == 0 {
            None
        } else {
            Some(pool.get_class_internal_name(outer_class_index)?.replace('/', "."))
        };
        let inner_name_index = source.read_u16()?;
        let inner_simple_name = if inner_name_index == 0 {
            None
        } else {
            Some(pool.get_str(inner_name_index)?.to_owned())
        };
        let access_flags = NestedClassAccessFlags::from_bits_truncate(source.read_u16()?);
        entries.push(InnerClassFact {
            inner_name,
            outer_name,
            inner_simple_name,
            access_flags,
        });
    }
    expect_fully_consumed("InnerClasses", info, &source)?;
    Ok(entries)
}

/// Resolves a `RuntimeVisibleAnnotations`/`RuntimeInvisibleAnnotations` attribute's `info` bytes
/// to its list of annotations.
pub fn decode_annotations(info: &[u8], pool: &ConstantPool) -> Result<Vec<Annotation>, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let count = source.read_u16()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(decode_annotation(&mut source, pool)?);
    }
    Ok(annotations)
}

/// Resolves a `RuntimeVisibleParameterAnnotations`/`RuntimeInvisibleParameterAnnotations`
/// attribute's `info` bytes to one annotation list per parameter.
pub fn decode_parameter_annotations(
    info: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<Vec<Annotation>>, ParseError> {
    let mut source = ByteSource::from_bytes(info.to_vec());
    let num_parameters = source.read_u8()?;
    let mut per_parameter = Vec::with_capacity(num_parameters as usize);
    for _ in 0..num_parameters {
        let count = source.read_u16()?;
        let mut annotations = Vec::with_capacity(count as usize);
        for _ in 0..count {
            annotations.push(decode_annotation(&mut source, pool)?);
        }
        per_parameter.push(annotations);
    }
    Ok(per_parameter)
}

fn decode_annotation(source: &mut ByteSource, pool: &ConstantPool) -> Result<Annotation, ParseError> {
    let type_index = source.read_u16()?;
    let type_descriptor = pool.get_str(type_index)?;
    let type_name = descriptor_to_dotted_name(type_descriptor);
    let pair_count = source.read_u16()?;
    let mut elements = Vec::with_capacity(pair_count as usize);
    for _ in 0..pair_count {
        let name_index = source.read_u16()?;
        let name = pool.get_str(name_index)?.to_owned();
        let value = decode_element_value(source, pool)?;
        elements.push((name, value));
    }
    Ok(Annotation { type_name, elements })
}

fn decode_element_value(
    source: &mut ByteSource,
    pool: &ConstantPool,
) -> Result<ElementValue, ParseError> {
    let tag = source.read_u8()?;
    let value = match tag {
        b'B' | b'C' | b'I' | b'S' | b'Z' | b'D' | b'F' | b'J' => {
            let index = source.read_u16()?;
            ElementValue::Const(pool.get_constant_value(index)?)
        }
        b's' => {
            let index = source.read_u16()?;
            ElementValue::Const(ConstantValue::String(pool.get_str(index)?.to_owned()))
        }
        b'e' => {
            let type_index = source.read_u16()?;
            let const_index = source.read_u16()?;
            ElementValue::Enum {
                type_descriptor: pool.get_str(type_index)?.to_owned(),
                const_name: pool.get_str(const_index)?.to_owned(),
            }
        }
        b'c' => {
            let class_index = source.read_u16()?;
            ElementValue::ClassLiteral(pool.get_str(class_index)?.to_owned())
        }
        b'@' => ElementValue::Annotation(Box::new(decode_annotation(source, pool)?)),
        b'[' => {
            let count = source.read_u16()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(decode_element_value(source, pool)?);
            }
            ElementValue::Array(values)
        }
        other => {
            return Err(ParseError::InvalidDescriptor(format!(
                "unrecognized annotation element tag {:?}",
                other as char
            )))
        }
    };
    Ok(value)
}

/// Converts a class-literal or annotation-type descriptor (`Lcom/example/Foo;`) to a dotted
/// binary name. Non-reference descriptors (primitives, arrays) are returned unchanged, matching
/// how they appear in class-literal element values.
pub(crate) fn descriptor_to_dotted_name(descriptor: &str) -> String {
    if let Some(inner) = descriptor.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        inner.replace('/', ".")
    } else {
        descriptor.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_to_dotted_name_strips_l_and_semicolon() {
        assert_eq!(
            descriptor_to_dotted_name("Ljava/lang/Deprecated;"),
            "java.lang.Deprecated"
        );
    }

    #[test]
    fn descriptor_to_dotted_name_passes_through_non_reference() {
        assert_eq!(descriptor_to_dotted_name("I"), "I");
        assert_eq!(descriptor_to_dotted_name("[I"), "[I");
    }
}
