//! Call-site descriptors and metric-name derivation.
//!
//! A metric name is derived as `<Type>.<method>` or, for generic call sites,
//! `<Type>.<method><A,B>` with each type argument rendered by its simple
//! name. An explicit non-blank name always wins.

use std::borrow::Cow;

/// Describes an instrumented call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    declaring_type: Cow<'static, str>,
    method: Cow<'static, str>,
    type_args: Vec<Cow<'static, str>>,
}

impl CallDescriptor {
    pub fn new(declaring_type: impl Into<Cow<'static, str>>, method: impl Into<Cow<'static, str>>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
            type_args: Vec::new(),
        }
    }

    /// Descriptor whose declaring type is `T`, rendered by its simple name.
    pub fn of<T: ?Sized>(method: impl Into<Cow<'static, str>>) -> Self {
        Self::new(simple_type_name::<T>(), method)
    }

    /// Append a type argument by name.
    pub fn with_type_arg(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.type_args.push(name.into());
        self
    }

    /// Append `T` as a type argument.
    pub fn with_type<T: ?Sized>(self) -> Self {
        self.with_type_arg(simple_type_name::<T>())
    }

    pub fn declaring_type(&self) -> &str { &self.declaring_type }
    pub fn method(&self) -> &str { &self.method }
    pub fn type_args(&self) -> &[Cow<'static, str>] { &self.type_args }

    pub fn is_generic(&self) -> bool {
        !self.type_args.is_empty()
    }

    /// Derived metric name.
    pub fn metric_name(&self) -> String {
        if !self.is_generic() {
            return format!("{}.{}", self.declaring_type, self.method);
        }
        let args = self
            .type_args
            .iter()
            .map(|a| a.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}.{}<{}>", self.declaring_type, self.method, args)
    }

    /// `explicit` when it is set and not blank, otherwise the derived name.
    pub fn resolve_name(&self, explicit: Option<&str>) -> String {
        match explicit {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.metric_name(),
        }
    }
}

/// `std::any::type_name` with every module path stripped,
/// e.g. `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn simple_type_name<T: ?Sized>() -> String {
    strip_paths(std::any::type_name::<T>())
}

fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut ident = String::new();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            ident.push(c);
        } else {
            push_last_segment(&mut out, &ident);
            ident.clear();
            out.push(c);
        }
    }
    push_last_segment(&mut out, &ident);
    out
}

fn push_last_segment(out: &mut String, path: &str) {
    if let Some(last) = path.rsplit("::").next() {
        out.push_str(last);
    }
}
