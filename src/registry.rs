//! Type Registry
//!
//! Owns the introspection document and builds one `data_type` entry per
//! distinct resolved type name.
//!
//! A model creates exactly one [`TypeRegistry`] at its entry point and hands
//! `&mut TypeRegistry` to every process that reports its types. All mutation
//! goes through `&mut self`; sharing a registry between threads is up to the
//! caller (for example by wrapping it in a `Mutex`). The registry does no
//! locking of its own.

use std::any::TypeId;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::config::{CollisionPolicy, IntrospectionConfig};
use crate::document::{tags, Document, NodeId};
use crate::error::{Result, TypeError};
use crate::introspect::{DataType, Introspect, SchemaNode};
use crate::names::TypeName;
use crate::writer::{self, RenderOptions};

/// The Rust type that created a `data_type` entry
#[derive(Debug, Clone, Copy)]
struct Origin {
    id: TypeId,
    rust_name: &'static str,
}

/// The introspection context for one model run
pub struct TypeRegistry {
    /// The document tree, root `forsyde_types` included
    document: Document,
    /// Creator of each `data_type` entry built by `traverse`
    origins: HashMap<NodeId, Origin>,
    on_collision: CollisionPolicy,
    render: RenderOptions,
}

impl TypeRegistry {
    /// Create a registry holding only the root element, with default settings
    pub fn new() -> Self {
        Self::with_config(&IntrospectionConfig::default())
    }

    /// Create a registry using the collision policy and layout from `config`
    pub fn with_config(config: &IntrospectionConfig) -> Self {
        Self {
            document: Document::new(),
            origins: HashMap::new(),
            on_collision: config.registry.on_collision,
            render: config.output.render_options(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> NodeId {
        self.document.root()
    }

    /// Allocate a child element of the given tag under `parent`
    pub fn add_node(&mut self, parent: NodeId, tag: &'static str) -> Result<NodeId> {
        self.document.append_child(parent, tag)
    }

    /// Attach a key/value pair to `node`. Each key can be set once.
    pub fn add_attribute(&mut self, node: NodeId, key: &'static str, value: impl Into<String>) -> Result<()> {
        self.document.set_attribute(node, key, value)
    }

    /// Register the schema of `T` and return its resolved name.
    ///
    /// The first call for a name appends a `data_type` entry under the root and
    /// builds its subtree. Later calls for the same name only do the lookup.
    ///
    /// Nested element and member types are always built inline inside the
    /// entry, without consulting or creating their own top-level entries. So
    /// `traverse::<Vec<i32>>()` followed by `traverse::<i32>()` yields two
    /// independent entries.
    ///
    /// With [`CollisionPolicy::Error`], a different Rust type that resolves to
    /// an already registered name fails with [`TypeError::NameCollision`].
    /// With [`CollisionPolicy::Alias`] it silently shares the first entry.
    pub fn traverse<T: Introspect>(&mut self) -> Result<TypeName> {
        let name = T::type_name();

        if let Some(existing) = self.find(name.as_str()) {
            self.check_origin::<T>(existing, &name)?;
            trace!(name = %name, "type already registered");
            return Ok(name);
        }

        let root = self.root();
        let node = self.add_node(root, tags::DATA_TYPE)?;
        self.add_attribute(node, tags::NAME, name.as_str())?;
        self.origins.insert(
            node,
            Origin {
                id: TypeId::of::<T>(),
                rust_name: std::any::type_name::<T>(),
            },
        );
        self.build(node, &T::describe())?;

        debug!(name = %name, rust_type = std::any::type_name::<T>(), "registered data type");
        Ok(name)
    }

    /// Render the document and write it to `path`, replacing existing content.
    ///
    /// A failure leaves the in-memory document untouched, so retrying with a
    /// different path is safe.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = writer::render(&self.document, &self.render);
        let bytes = writer::write(path, &body)?;
        info!(path = %path.display(), bytes, types = self.len(), "persisted type introspection");
        Ok(())
    }

    /// Whether a `data_type` entry with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of `data_type` entries
    pub fn len(&self) -> usize {
        self.document
            .children(self.root())
            .filter(|(_, e)| e.tag() == tags::DATA_TYPE)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered entries in registration order, read back from the tree.
    ///
    /// Entries whose subtree does not follow the schema layout (for example
    /// nodes added by hand through [`add_node`](Self::add_node)) are skipped.
    pub fn data_types(&self) -> Vec<DataType> {
        self.document
            .children(self.root())
            .filter(|(_, e)| e.tag() == tags::DATA_TYPE)
            .filter_map(|(id, _)| self.read_entry(id))
            .collect()
    }

    /// Look up one entry by name
    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.find(name).and_then(|id| self.read_entry(id))
    }

    // Linear scan of the root's children; the set of types in one model is
    // small and fixed.
    fn find(&self, name: &str) -> Option<NodeId> {
        self.document
            .children(self.root())
            .find(|(_, e)| e.tag() == tags::DATA_TYPE && e.attribute(tags::NAME) == Some(name))
            .map(|(id, _)| id)
    }

    fn check_origin<T: Introspect>(&self, existing: NodeId, name: &TypeName) -> Result<()> {
        let Some(origin) = self.origins.get(&existing) else {
            return Ok(());
        };
        if origin.id == TypeId::of::<T>() {
            return Ok(());
        }

        match self.on_collision {
            CollisionPolicy::Error => Err(TypeError::NameCollision {
                name: name.to_string(),
                existing: origin.rust_name,
                incoming: std::any::type_name::<T>(),
            }),
            CollisionPolicy::Alias => {
                warn!(
                    name = %name,
                    existing = origin.rust_name,
                    incoming = std::any::type_name::<T>(),
                    "distinct types share one name, reusing existing entry"
                );
                Ok(())
            }
        }
    }

    fn build(&mut self, parent: NodeId, schema: &SchemaNode) -> Result<()> {
        match schema {
            SchemaNode::Primitive { name, size } => {
                let node = self.add_node(parent, tags::PRIMITIVE)?;
                self.add_attribute(node, tags::NAME, name.as_str())?;
                self.add_attribute(node, tags::SIZE, size.to_string())?;
            }
            SchemaNode::Sequence { size, element } => {
                let node = self.add_node(parent, tags::VECTOR)?;
                self.build(node, element)?;
                self.add_attribute(node, tags::SIZE, size.to_string())?;
            }
            SchemaNode::Tuple { members } => {
                let node = self.add_node(parent, tags::TUPLE)?;
                for member in members {
                    self.build(node, member)?;
                }
            }
        }
        Ok(())
    }

    fn read_entry(&self, id: NodeId) -> Option<DataType> {
        let element = self.document.get(id)?;
        let name = element.attribute(tags::NAME)?;
        let schema = self.read_schema(*element.children().first()?)?;
        Some(DataType {
            name: TypeName::from(name.to_string()),
            schema,
        })
    }

    fn read_schema(&self, id: NodeId) -> Option<SchemaNode> {
        let element = self.document.get(id)?;
        let size = || -> Option<usize> { element.attribute(tags::SIZE)?.parse().ok() };

        match element.tag() {
            tags::PRIMITIVE => Some(SchemaNode::Primitive {
                name: TypeName::from(element.attribute(tags::NAME)?.to_string()),
                size: size()?,
            }),
            tags::VECTOR => Some(SchemaNode::Sequence {
                size: size()?,
                element: Box::new(self.read_schema(*element.children().first()?)?),
            }),
            tags::TUPLE => Some(SchemaNode::Tuple {
                members: element
                    .children()
                    .iter()
                    .map(|child| self.read_schema(*child))
                    .collect::<Option<Vec<_>>>()?,
            }),
            _ => None,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
