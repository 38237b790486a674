//! A minimal class file encoder, the inverse of [`super::class_file::decode_class`].
//!
//! Built for producing test fixtures without a JDK available to run `javac`: it only emits the
//! structures this crate's decoder understands, not a general-purpose classfile writer.

use crate::jvm::access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags, NestedClassAccessFlags};

/// Builds the bytes of one class file.
pub struct ClassFileBuilder {
    internal_name: String,
    super_name: Option<String>,
    access_flags: ClassAccessFlags,
    interfaces: Vec<String>,
    fields: Vec<(String, String, FieldAccessFlags)>,
    methods: Vec<(String, String, MethodAccessFlags)>,
    enclosing_method: Option<(String, Option<(String, String)>)>,
    inner_classes: Vec<(String, Option<String>, Option<String>, NestedClassAccessFlags)>,
}

impl ClassFileBuilder {
    /// Starts building a class with the given internal (slash-separated) name.
    #[must_use]
    pub fn new(internal_name: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            super_name: None,
            access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            enclosing_method: None,
            inner_classes: Vec::new(),
        }
    }

    /// Sets the direct superclass's internal name.
    #[must_use]
    pub fn super_name(mut self, name: impl Into<String>) -> Self {
        self.super_name = Some(name.into());
        self
    }

    /// Overrides the default `ACC_PUBLIC | ACC_SUPER` access flags.
    #[must_use]
    pub fn access_flags(mut self, flags: ClassAccessFlags) -> Self {
        self.access_flags = flags;
        self
    }

    /// Appends one directly implemented interface's internal name.
    #[must_use]
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    /// Appends one field, with no attributes.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        access_flags: FieldAccessFlags,
    ) -> Self {
        self.fields.push((name.into(), descriptor.into(), access_flags));
        self
    }

    /// Appends one method, with no attributes.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        access_flags: MethodAccessFlags,
    ) -> Self {
        self.methods.push((name.into(), descriptor.into(), access_flags));
        self
    }

    /// Attaches an `EnclosingMethod` class attribute, naming the enclosing class and, when this
    /// class is enclosed by a method body, that method's name and descriptor.
    #[must_use]
    pub fn enclosing_method(
        mut self,
        class_internal_name: impl Into<String>,
        method: Option<(String, String)>,
    ) -> Self {
        self.enclosing_method = Some((class_internal_name.into(), method));
        self
    }

    /// Appends one `InnerClasses` entry.
    #[must_use]
    pub fn inner_class(
        mut self,
        inner_internal_name: impl Into<String>,
        outer_internal_name: Option<String>,
        inner_simple_name: Option<String>,
        access_flags: NestedClassAccessFlags,
    ) -> Self {
        self.inner_classes.push((inner_internal_name.into(), outer_internal_name, inner_simple_name, access_flags));
        self
    }

    /// Serializes the class file.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::default();
        let this_class = pool.class(&self.internal_name);
        let super_class = self.super_name.as_deref().map(|n| pool.class(n)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let fields: Vec<_> = self
            .fields
            .iter()
            .map(|(name, descriptor, flags)| (*flags, pool.utf8(name), pool.utf8(descriptor)))
            .collect();
        let methods: Vec<_> = self
            .methods
            .iter()
            .map(|(name, descriptor, flags)| (*flags, pool.utf8(name), pool.utf8(descriptor)))
            .collect();

        let mut class_attributes: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some((class_internal_name, method)) = &self.enclosing_method {
            let class_index = pool.class(class_internal_name);
            let method_index = method
                .as_ref()
                .map(|(name, descriptor)| pool.name_and_type(name, descriptor))
                .unwrap_or(0);
            let mut info = Vec::new();
            info.extend_from_slice(&class_index.to_be_bytes());
            info.extend_from_slice(&method_index.to_be_bytes());
            class_attributes.push((pool.utf8("EnclosingMethod"), info));
        }
        if !self.inner_classes.is_empty() {
            let mut info = Vec::new();
            info.extend_from_slice(&(self.inner_classes.len() as u16).to_be_bytes());
            for (inner, outer, simple_name, flags) in &self.inner_classes {
                let inner_index = pool.class(inner);
                let outer_index = outer.as_deref().map(|n| pool.class(n)).unwrap_or(0);
                let simple_name_index = simple_name.as_deref().map(|n| pool.utf8(n)).unwrap_or(0);
                info.extend_from_slice(&inner_index.to_be_bytes());
                info.extend_from_slice(&outer_index.to_be_bytes());
                info.extend_from_slice(&simple_name_index.to_be_bytes());
                info.extend_from_slice(&flags.bits().to_be_bytes());
            }
            class_attributes.push((pool.utf8("InnerClasses"), info));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&61u16.to_be_bytes()); // major: Java 17
        pool.write_into(&mut out);
        out.extend_from_slice(&self.access_flags.bits().to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for index in interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        out.extend_from_slice(&(fields.len() as u16).to_be_bytes());
        for (flags, name_index, descriptor_index) in fields {
            out.extend_from_slice(&flags.bits().to_be_bytes());
            out.extend_from_slice(&name_index.to_be_bytes());
            out.extend_from_slice(&descriptor_index.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        }
        out.extend_from_slice(&(methods.len() as u16).to_be_bytes());
        for (flags, name_index, descriptor_index) in methods {
            out.extend_from_slice(&flags.bits().to_be_bytes());
            out.extend_from_slice(&name_index.to_be_bytes());
            out.extend_from_slice(&descriptor_index.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        }
        out.extend_from_slice(&(class_attributes.len() as u16).to_be_bytes());
        for (name_index, info) in class_attributes {
            out.extend_from_slice(&name_index.to_be_bytes());
            out.extend_from_slice(&(info.len() as u32).to_be_bytes());
            out.extend_from_slice(&info);
        }
        out
    }
}

#[derive(Default)]
struct PoolBuilder {
    entries: Vec<PoolEntry>,
}

enum PoolEntry {
    Utf8(String),
    Class { name_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
}

impl PoolBuilder {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.entries.iter().position(|e| matches!(e, PoolEntry::Utf8(v) if v == value)) {
            return (index + 1) as u16;
        }
        self.entries.push(PoolEntry::Utf8(value.to_owned()));
        self.entries.len() as u16
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name_index = self.utf8(internal_name);
        if let Some(index) = self.entries.iter().position(|e| matches!(e, PoolEntry::Class { name_index: n } if *n == name_index)) {
            return (index + 1) as u16;
        }
        self.entries.push(PoolEntry::Class { name_index });
        self.entries.len() as u16
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        if let Some(index) = self.entries.iter().position(|e| {
            matches!(e, PoolEntry::NameAndType { name_index: n, descriptor_index: d } if *n == name_index && *d == descriptor_index)
        }) {
            return (index + 1) as u16;
        }
        self.entries.push(PoolEntry::NameAndType { name_index, descriptor_index });
        self.entries.len() as u16
    }

    fn write_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&((self.entries.len() + 1) as u16).to_be_bytes());
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(value) => {
                    out.push(1);
                    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
                    out.extend_from_slice(value.as_bytes());
                }
                PoolEntry::Class { name_index } => {
                    out.push(7);
                    out.extend_from_slice(&name_index.to_be_bytes());
                }
                PoolEntry::NameAndType { name_index, descriptor_index } => {
                    out.push(12);
                    out.extend_from_slice(&name_index.to_be_bytes());
                    out.extend_from_slice(&descriptor_index.to_be_bytes());
                }
            }
        }
    }
}
