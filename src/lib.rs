//! ForSyDe Type Introspection
//!
//! Derives the structural schema of the signal types used in a ForSyDe model
//! and persists all of them as one XML document for downstream tools.
//!
//! ## Features
//!
//! - **Compile-time shape dispatch**: primitives, `Vec<T>`, and tuples up to 12
//!   members; anything else is rejected by the compiler
//! - **Deduplication**: one `data_type` entry per resolved type name
//! - **Stable names for primitives**: C/C++ spellings (`int`, `double`, ...)
//!   plus user bindings through [`define_type!`]
//! - **Collision detection**: two distinct types sharing one name fail loudly,
//!   unless configured to alias
//!
//! ## Output
//!
//! ```text
//! <?xml version="1.0" ?>
//! <!-- Automatically generated by ForSyDe -->
//! <forsyde_types>
//!     <data_type name="int">
//!         <primitive name="int" size="4"/>
//!     </data_type>
//!     <data_type name="alloc::vec::Vec&lt;f32&gt;">
//!         <vector size="24">
//!             <primitive name="float" size="4"/>
//!         </vector>
//!     </data_type>
//! </forsyde_types>
//! ```
//!
//! Names of types without an explicit binding come from
//! [`std::any::type_name`] and are not stable across compilers or builds.

pub mod names;
pub mod introspect;
pub mod document;
pub mod registry;
pub mod writer;
pub mod config;
pub mod error;

pub use names::TypeName;
pub use introspect::{DataType, Introspect, SchemaNode};
pub use document::{Document, Element, NodeId};
pub use registry::TypeRegistry;
pub use config::{CollisionPolicy, IntrospectionConfig, OutputFormat};
pub use writer::RenderOptions;
pub use error::{TypeError, Result};
