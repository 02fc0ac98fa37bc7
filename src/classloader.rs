//! External collaborator boundary: the class-loader / primitive-class
//! lookups the printer's method-name resolution ultimately rests on.
//!
//! Grounded on jato's `runtime/classloader.c` (`native_vmclassloader_*`)
//! and `include/vm/annotation.h` (the shape of a minimal loaded-entity
//! record). This module owns no class-file parser or bytecode verifier —
//! it is the header-only boundary the printer depends on but never
//! implements.

use crate::printer::MethodResolver;

/// A method resolved out of a loaded class, by the handle an inline cache
/// stashed as an instruction's immediate operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedMethod {
    pub class_name: String,
    pub method_name: String,
}

/// The subset of class-loading the back-end depends on.
pub trait ClassLoader {
    /// Resolves an inline-cache method handle to the method it was cached
    /// for. `None` means the producing pass handed the printer a handle
    /// with no backing method — a bug in that pass, not here.
    fn resolve_method(&self, handle: u64) -> Option<&LoadedMethod>;

    /// The class name for a primitive type tag, as in
    /// `native_vmclassloader_getprimitiveclass`.
    fn primitive_class_name(&self, type_tag: char) -> Option<&'static str> {
        primitive_class_name(type_tag)
    }
}

/// `'Z' -> "boolean"`, ..., `'V' -> "void"` — the same table as
/// `native_vmclassloader_getprimitiveclass`'s `primitive_class_names`.
pub fn primitive_class_name(type_tag: char) -> Option<&'static str> {
    match type_tag {
        'Z' => Some("boolean"),
        'B' => Some("byte"),
        'C' => Some("char"),
        'D' => Some("double"),
        'F' => Some("float"),
        'I' => Some("int"),
        'J' => Some("long"),
        'S' => Some("short"),
        'V' => Some("void"),
        _ => None,
    }
}

/// Adapts a `ClassLoader` into the printer's `MethodResolver` capability.
pub struct ClassLoaderResolver<'a, L: ClassLoader> {
    loader: &'a L,
}

impl<'a, L: ClassLoader> ClassLoaderResolver<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        Self { loader }
    }
}

impl<'a, L: ClassLoader> MethodResolver for ClassLoaderResolver<'a, L> {
    fn resolve_method_name(&self, imm: u64) -> Option<&str> {
        self.loader.resolve_method(imm).map(|m| m.method_name.as_str())
    }
}
