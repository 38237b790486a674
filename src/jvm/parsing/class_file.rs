//! Top-level class file decoding: the sequence of steps turning a byte stream into a
//! [`ClassFact`].

use crate::io::ByteSource;
use crate::jvm::access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use crate::jvm::constant_pool::ConstantPool;
use crate::jvm::fact::{ClassFact, FieldFact, MethodFact, ParameterFact};
use crate::jvm::parsing::attribute::{
    decode_annotations, decode_constant_value, decode_enclosing_method, decode_exceptions,
    decode_inner_classes, decode_method_parameters, decode_parameter_annotations,
    read_raw_attributes, take_single, RawAttribute,
};
use crate::jvm::parsing::context::DecodeOptions;
use crate::jvm::parsing::errors::ParseError;

const MAGIC: u32 = 0xCAFE_BABE;
const MIN_SUPPORTED_MAJOR_VERSION: u16 = 45; // JDK 1.0.2

/// Decodes one class file's bytes into a [`ClassFact`].
///
/// `root_index` is recorded on the resulting fact for later shadowing resolution; it plays no
/// part in decoding itself.
pub fn decode_class(
    bytes: &[u8],
    root_index: usize,
    options: &DecodeOptions,
) -> Result<ClassFact, ParseError> {
    let mut source = ByteSource::from_bytes(bytes.to_vec());

    let magic = source.read_u32()?;
    if magic != MAGIC {
        return Err(ParseError::InvalidMagic(magic));
    }
    let _minor_version = source.read_u16()?;
    let major_version = source.read_u16()?;
    if major_version < MIN_SUPPORTED_MAJOR_VERSION {
        return Err(ParseError::UnsupportedVersion(major_version));
    }

    let pool = ConstantPool::parse(&mut source)?;

    let raw_access_flags = source.read_u16()?;
    let access_flags = ClassAccessFlags::from_bits_truncate(raw_access_flags);
    let kind = access_flags.kind();

    let this_class_index = source.read_u16()?;
    let binary_name = pool
        .get_class_internal_name(this_class_index)?
        .replace('/', ".");

    let super_class_index = source.read_u16()?;
    let super_name = if super_class_index == 0 {
        None
    } else {
        Some(pool.get_class_internal_name(super_class_index)?.replace('/', "."))
    };

    let interfaces_count = source.read_u16()?;
    let mut interfaces = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        let index = source.read_u16()?;
        interfaces.push(pool.get_class_internal_name(index)?.replace('/', "."));
    }
    let interfaces = ClassFact::dedup_interfaces_preserving_order(interfaces);

    let fields_count = source.read_u16()?;
    let mut fields = Vec::with_capacity(fields_count as usize);
    for _ in 0..fields_count {
        fields.push(decode_field(&mut source, &pool, options)?);
    }
    if !options.ignore_visibility_for_fields {
        fields.retain(|field| {
            field.access_flags.intersects(FieldAccessFlags::PUBLIC | FieldAccessFlags::PROTECTED)
        });
    }

    let methods_count = source.read_u16()?;
    let mut methods = Vec::with_capacity(methods_count as usize);
    for _ in 0..methods_count {
        methods.push(decode_method(&mut source, &pool, options)?);
    }
    if !options.ignore_visibility_for_methods {
        methods.retain(|method| {
            method.access_flags.intersects(MethodAccessFlags::PUBLIC | MethodAccessFlags::PROTECTED)
        });
    }

    let mut class_attributes = read_raw_attributes(&mut source, &pool)?;
    let signature = take_single(&mut class_attributes, "Signature")?
        .map(|raw| signature_string(&raw, &pool))
        .transpose()?;
    let annotations = collect_annotations(&mut class_attributes, &pool, options)?;
    let enclosing_method = take_single(&mut class_attributes, "EnclosingMethod")?
        .map(|raw| decode_enclosing_method(&raw.info, &pool))
        .transpose()?;
    let inner_classes = take_single(&mut class_attributes, "InnerClasses")?
        .map(|raw| decode_inner_classes(&raw.info, &pool))
        .transpose()?
        .unwrap_or_default();

    Ok(ClassFact {
        binary_name,
        kind,
        access_flags,
        super_name,
        interfaces,
        annotations,
        signature,
        fields: options.enable_field_info.then_some(fields),
        methods: options.enable_method_info.then_some(methods),
        enclosing_method,
        inner_classes,
        root_index,
    })
}

fn signature_string(raw: &RawAttribute, pool: &ConstantPool) -> Result<String, ParseError> {
    let mut source = ByteSource::from_bytes(raw.info.clone());
    let index = source.read_u16()?;
    Ok(pool.get_str(index)?.to_owned())
}

fn collect_annotations(
    raws: &mut Vec<RawAttribute>,
    pool: &ConstantPool,
    options: &DecodeOptions,
) -> Result<Vec<String>, ParseError> {
    let mut names = Vec::new();
    if !options.enable_annotation_info {
        take_single(raws, "RuntimeVisibleAnnotations")?;
        take_single(raws, "RuntimeInvisibleAnnotations")?;
        return Ok(names);
    }
    if let Some(raw) = take_single(raws, "RuntimeVisibleAnnotations")? {
        names.extend(decode_annotations(&raw.info, pool)?.into_iter().map(|a| a.type_name));
    }
    if options.include_runtime_invisible_annotations {
        if let Some(raw) = take_single(raws, "RuntimeInvisibleAnnotations")? {
            names.extend(decode_annotations(&raw.info, pool)?.into_iter().map(|a| a.type_name));
        }
    }
    Ok(names)
}

fn decode_field(
    source: &mut ByteSource,
    pool: &ConstantPool,
    options: &DecodeOptions,
) -> Result<FieldFact, ParseError> {
    let access_flags = FieldAccessFlags::from_bits_truncate(source.read_u16()?);
    let name = pool.get_str(source.read_u16()?)?.to_owned();
    let descriptor = pool.get_str(source.read_u16()?)?.to_owned();
    let mut raws = read_raw_attributes(source, pool)?;

    let signature = take_single(&mut raws, "Signature")?
        .map(|raw| signature_string(&raw, pool))
        .transpose()?;
    let constant_value_raw = take_single(&mut raws, "ConstantValue")?;
    let constant_value = if options.enable_static_final_constants {
        constant_value_raw.map(|raw| decode_constant_value(&raw.info, pool)).transpose()?
    } else {
        None
    };
    let annotations = collect_annotations(&mut raws, pool, options)?;

    Ok(FieldFact {
        name,
        descriptor,
        signature,
        access_flags,
        annotations,
        constant_value,
    })
}

fn decode_method(
    source: &mut ByteSource,
    pool: &ConstantPool,
    options: &DecodeOptions,
) -> Result<MethodFact, ParseError> {
    let access_flags = MethodAccessFlags::from_bits_truncate(source.read_u16()?);
    let name = pool.get_str(source.read_u16()?)?.to_owned();
    let descriptor = pool.get_str(source.read_u16()?)?.to_owned();
    let mut raws = read_raw_attributes(source, pool)?;

    let signature = take_single(&mut raws, "Signature")?
        .map(|raw| signature_string(&raw, pool))
        .transpose()?;
    let exceptions = take_single(&mut raws, "Exceptions")?
        .map(|raw| decode_exceptions(&raw.info, pool))
        .transpose()?
        .unwrap_or_default();
    let annotations = collect_annotations(&mut raws, pool, options)?;

    let mut parameters: Vec<ParameterFact> = take_single(&mut raws, "MethodParameters")?
        .map(|raw| decode_method_parameters(&raw.info, pool))
        .transpose()?
        .unwrap_or_default()
        .into_iter()
        .map(|(name, access_flags)| ParameterFact {
            name,
            access_flags,
            annotations: Vec::new(),
        })
        .collect();

    if let Some(raw) = take_single(&mut raws, "RuntimeVisibleParameterAnnotations")? {
        merge_parameter_annotations(&mut parameters, &raw.info, pool)?;
    }
    if options.include_runtime_invisible_annotations {
        if let Some(raw) = take_single(&mut raws, "RuntimeInvisibleParameterAnnotations")? {
            merge_parameter_annotations(&mut parameters, &raw.info, pool)?;
        }
    }

    Ok(MethodFact {
        name,
        descriptor,
        signature,
        access_flags,
        parameters,
        annotations,
        exceptions,
    })
}

fn merge_parameter_annotations(
    parameters: &mut Vec<ParameterFact>,
    info: &[u8],
    pool: &ConstantPool,
) -> Result<(), ParseError> {
    let per_parameter = decode_parameter_annotations(info, pool)?;
    if parameters.is_empty() && !per_parameter.is_empty() {
        parameters.resize_with(per_parameter.len(), || ParameterFact {
            name: None,
            access_flags: crate::jvm::access_flags::ParameterAccessFlags::empty(),
            annotations: Vec::new(),
        });
    }
    for (parameter, annotations) in parameters.iter_mut().zip(per_parameter) {
        parameter
            .annotations
            .extend(annotations.into_iter().map(|a| a.type_name));
    }
    Ok(())
}
