use std::collections::HashMap;
use tracing::debug;

use super::{
    builtin::BuiltIn,
    error::{Error, ReferenceKind},
    namespaces::{QualifiedName, TableKey},
    types::{Element, ElementContent, ElementType},
};

/// Every declared type and top-level element, keyed case-insensitively by
/// qualified name. Elements and types live in separate maps, so an element
/// may share its name with an unrelated type.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<TableKey, ElementType>,
    elements: HashMap<TableKey, ElementType>,
    primitive_elements: HashMap<TableKey, BuiltIn>,
}

impl TypeTable {
    /// Builds the table once the whole document graph has been walked.
    /// Names without a namespace adopt `target_namespace`. An element whose
    /// type is neither a primitive nor a declared type is an error.
    pub fn build(
        target_namespace: &str,
        elements: &[Element],
        types: &[ElementType],
    ) -> Result<Self, Error> {
        let mut table = Self::default();

        for ty in types {
            let mut ty = ty.clone();
            default_namespace(&mut ty.name, target_namespace);
            table.types.insert(ty.name.key(), ty);
        }

        for element in elements {
            let mut name = element.name.clone();
            default_namespace(&mut name, target_namespace);

            let mut ty = match &element.content {
                ElementContent::Typed(ty) => ty.clone(),
                ElementContent::Reference(_) => continue,
            };

            default_namespace(&mut ty, target_namespace);

            if let Some(primitive) = BuiltIn::from_qualified(&ty) {
                table.primitive_elements.insert(name.key(), primitive);
                continue;
            }

            let resolved = table
                .types
                .get(&ty.key())
                .cloned()
                .ok_or_else(|| Error::unresolved(ReferenceKind::Type, &ty))?;

            if table.types.contains_key(&name.key()) && name != resolved.name {
                debug!(
                    "Element {} resolves to {}, not the type of the same name",
                    name, resolved.name
                );
            }

            table.elements.insert(name.key(), resolved);
        }

        Ok(table)
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&ElementType> {
        self.types.get(&name.key())
    }

    pub fn resolve(&self, name: &QualifiedName) -> Result<&ElementType, Error> {
        self.get(name)
            .ok_or_else(|| Error::unresolved(ReferenceKind::Type, name))
    }

    /// Type a top-level element resolves to.
    pub fn element(&self, name: &QualifiedName) -> Option<&ElementType> {
        self.elements.get(&name.key())
    }

    /// Primitive type of an element declared directly with a built-in type.
    pub fn primitive_element(&self, name: &QualifiedName) -> Option<BuiltIn> {
        self.primitive_elements.get(&name.key()).copied()
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.types.contains_key(&name.key())
    }

    pub fn contains_element(&self, name: &QualifiedName) -> bool {
        self.elements.contains_key(&name.key())
            || self.primitive_elements.contains_key(&name.key())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn default_namespace(name: &mut QualifiedName, target_namespace: &str) {
    if name.namespace.is_empty() {
        name.namespace = target_namespace.to_owned();
    }
}
