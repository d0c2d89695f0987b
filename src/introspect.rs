//! Structural Dispatch
//!
//! Every type the registry can describe implements [`Introspect`]. The shape of
//! a type is one of three closed categories, resolved at compile time by which
//! impl applies:
//!
//! - **Primitive**: any type declared with [`define_type!`](crate::define_type)
//! - **Sequence**: `Vec<T>`
//! - **Tuple**: `(T1,)` through `(T1, ..., T12)`
//!
//! Types outside these categories have no impl and are rejected by the
//! compiler before any registry call exists.

use std::mem;

use serde::Serialize;

use crate::names::TypeName;

/// Structural description of a type, independent of any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaNode {
    /// A leaf. `size` is the byte footprint of the type.
    Primitive { name: TypeName, size: usize },

    /// A homogeneous sequence. `size` is the footprint of the sequence
    /// handle itself (`size_of::<Vec<T>>()`), not of its contents.
    Sequence { size: usize, element: Box<SchemaNode> },

    /// A fixed-arity heterogeneous tuple, members in declaration order.
    Tuple { members: Vec<SchemaNode> },
}

impl SchemaNode {
    /// Primitive description of `T`, named by `T`'s resolver binding
    pub fn primitive<T: Introspect>() -> Self {
        SchemaNode::Primitive {
            name: T::type_name(),
            size: mem::size_of::<T>(),
        }
    }

    /// Number of direct children this node has in the document
    pub fn arity(&self) -> usize {
        match self {
            SchemaNode::Primitive { .. } => 0,
            SchemaNode::Sequence { .. } => 1,
            SchemaNode::Tuple { members } => members.len(),
        }
    }
}

/// A registered top-level type: its name and its structural subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataType {
    pub name: TypeName,
    pub schema: SchemaNode,
}

/// A type whose shape can be written into the introspection document.
///
/// Implement it with [`define_type!`](crate::define_type) for primitives.
/// Implementing it by hand is possible for wrapper types that should be
/// described with the shape of what they wrap.
pub trait Introspect: 'static {
    /// Display name of the type, used as the registry's dedup key.
    ///
    /// The default is the compiler-provided fallback, which is not stable
    /// across builds. See [`crate::names`].
    fn type_name() -> TypeName {
        TypeName::fallback::<Self>()
    }

    /// The structural description of the type.
    fn describe() -> SchemaNode;
}

impl<T: Introspect> Introspect for Vec<T> {
    fn describe() -> SchemaNode {
        SchemaNode::Sequence {
            size: mem::size_of::<Vec<T>>(),
            element: Box::new(T::describe()),
        }
    }
}

macro_rules! impl_introspect_tuple {
    () => {};
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Introspect $(, $rest: Introspect)*> Introspect for ($first, $($rest,)*) {
            fn describe() -> SchemaNode {
                SchemaNode::Tuple {
                    members: vec![$first::describe() $(, $rest::describe())*],
                }
            }
        }
        impl_introspect_tuple!($($rest),*);
    };
}

impl_introspect_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(
            i32::describe(),
            SchemaNode::Primitive { name: TypeName::new("int"), size: 4 }
        );
        assert_eq!(
            f64::describe(),
            SchemaNode::Primitive { name: TypeName::new("double"), size: 8 }
        );
    }

    #[test]
    fn test_sequence_reports_handle_size() {
        match Vec::<u8>::describe() {
            SchemaNode::Sequence { size, element } => {
                assert_eq!(size, mem::size_of::<Vec<u8>>());
                assert_eq!(*element, u8::describe());
            }
            other => panic!("Expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_members_in_order() {
        let schema = <(i16, bool, f32)>::describe();
        assert_eq!(schema.arity(), 3);
        assert_eq!(
            schema,
            SchemaNode::Tuple {
                members: vec![i16::describe(), bool::describe(), f32::describe()],
            }
        );
    }

    #[test]
    fn test_single_element_tuple() {
        assert_eq!(<(u32,)>::describe().arity(), 1);
    }

    #[test]
    fn test_nested_shapes() {
        let schema = <(Vec<Vec<i8>>, u64)>::describe();
        let SchemaNode::Tuple { members } = schema else {
            panic!("Expected Tuple");
        };
        let SchemaNode::Sequence { element, .. } = &members[0] else {
            panic!("Expected Sequence");
        };
        assert!(matches!(**element, SchemaNode::Sequence { .. }));
        assert_eq!(members[1], u64::describe());
    }
}
