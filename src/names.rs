//! Type Name Resolution
//!
//! Maps Rust types to the display names written into the `name` attributes of
//! the introspection document. Names are the registry's dedup key.
//!
//! Two sources feed a name:
//! - **Explicit bindings** declared at build time with [`define_type!`]. The
//!   built-in primitives are bound here using the LP64 C/C++ spellings that
//!   existing ForSyDe tooling expects (`i32` is `"int"`, `f64` is `"double"`).
//! - **The fallback**, [`TypeName::fallback`], which asks the compiler via
//!   [`std::any::type_name`]. Its output is NOT stable: it may differ between
//!   compiler versions, builds, and targets, and two different types may even
//!   share it. Documents that contain fallback names are not portable. Bind an
//!   explicit name for every type whose schema must be read by other tools.
//!
//! [`define_type!`]: crate::define_type

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// The resolved display name of a type.
///
/// Two types that resolve to the same name are the same entry as far as the
/// registry is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeName(Cow<'static, str>);

impl TypeName {
    /// Create a name from a build-time string.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Compiler-provided name for `T`.
    ///
    /// Not portable across compilers, builds, or runs. See the module docs.
    pub fn fallback<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&'static str> for TypeName {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Declare a type as a primitive of the introspection model.
///
/// `define_type!(T, "name")` binds an explicit, stable name. It always takes
/// priority over the fallback. `define_type!(T)` keeps the compiler-provided
/// fallback name, which is not portable.
///
/// The primitive's `size` is `std::mem::size_of::<T>()`.
///
/// ```
/// use forsyde_types::{define_type, TypeRegistry};
///
/// pub struct Complex {
///     pub re: f32,
///     pub im: f32,
/// }
///
/// define_type!(Complex, "complex");
///
/// let mut registry = TypeRegistry::new();
/// assert_eq!(registry.traverse::<Complex>().unwrap(), "complex");
/// ```
#[macro_export]
macro_rules! define_type {
    ($ty:ty) => {
        impl $crate::Introspect for $ty {
            fn describe() -> $crate::SchemaNode {
                $crate::SchemaNode::primitive::<$ty>()
            }
        }
    };
    ($ty:ty, $name:expr) => {
        impl $crate::Introspect for $ty {
            fn type_name() -> $crate::TypeName {
                $crate::TypeName::new($name)
            }

            fn describe() -> $crate::SchemaNode {
                $crate::SchemaNode::primitive::<$ty>()
            }
        }
    };
}

// Built-in primitives
define_type!(i8, "char");
define_type!(u8, "unsigned char");
define_type!(i16, "short int");
define_type!(u16, "unsigned short int");
define_type!(i32, "int");
define_type!(u32, "unsigned int");
define_type!(i64, "long int");
define_type!(u64, "unsigned long int");
define_type!(i128, "__int128");
define_type!(u128, "unsigned __int128");
define_type!(isize, "ssize_t");
define_type!(usize, "size_t");
define_type!(bool, "bool");
define_type!(char, "wchar_t");
define_type!(f32, "float");
define_type!(f64, "double");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Introspect;

    #[test]
    fn test_builtin_names() {
        assert_eq!(i32::type_name(), "int");
        assert_eq!(u64::type_name(), "unsigned long int");
        assert_eq!(char::type_name(), "wchar_t");
        assert_eq!(f64::type_name(), "double");
        assert_eq!(bool::type_name(), "bool");
    }

    #[test]
    fn test_explicit_binding_wins_over_fallback() {
        struct Bound;
        define_type!(Bound, "bound");

        assert_eq!(Bound::type_name(), "bound");
        assert_ne!(Bound::type_name(), TypeName::fallback::<Bound>());
    }

    #[test]
    fn test_fallback_mentions_type() {
        // Exact output is compiler-defined; only check it is non-empty and
        // names the type somewhere.
        struct Unbound;
        define_type!(Unbound);

        let name = Unbound::type_name();
        assert!(!name.as_str().is_empty());
        assert!(name.as_str().contains("Unbound"));
    }

    #[test]
    fn test_owned_and_borrowed_compare_equal() {
        assert_eq!(TypeName::from("int".to_string()), TypeName::new("int"));
    }
}
