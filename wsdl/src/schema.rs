//! Schema walking.
//!
//! A schema fragment is flattened into the elements and types it declares,
//! following `include` and `import` into other documents. Each
//! `(target namespace, source)` pair is walked at most once per run.

use std::collections::HashSet;
use tracing::{debug, warn};

use super::{
    builtin::BuiltIn,
    document::XmlElement,
    error::Error,
    namespaces::{expand, PrefixMap, QualifiedName, XML_SCHEMA},
    source::{resolve_location, DocumentSource},
    types::{Attribute, Element, ElementContent, ElementType, Facets, Structure, TypeShape},
};

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub max_depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaWalk {
    pub elements: Vec<Element>,
    pub types: Vec<ElementType>,
}

/// Walk state for one run: visited fragments and the anonymous type counter.
pub struct Walker<'s, S: ?Sized> {
    source: &'s mut S,
    options: WalkOptions,
    visited: HashSet<(String, String)>,
    local_namespaces: HashSet<String>,
    anonymous: usize,
}

#[derive(Clone, Copy)]
struct Scope<'a> {
    target_namespace: &'a str,
    prefixes: &'a PrefixMap,
    source: &'a str,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Group {
    Sequence,
    Choice,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

impl SchemaWalk {
    pub fn extend(&mut self, other: SchemaWalk) {
        self.elements.extend(other.elements);
        self.types.extend(other.types);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.types.is_empty()
    }
}

impl<'s, S: DocumentSource + ?Sized> Walker<'s, S> {
    pub fn new(source: &'s mut S) -> Self {
        Self::with_options(source, WalkOptions::default())
    }

    pub fn with_options(source: &'s mut S, options: WalkOptions) -> Self {
        Self {
            source,
            options,
            visited: HashSet::new(),
            local_namespaces: HashSet::new(),
            anonymous: 0,
        }
    }

    /// Marks `namespace` as provided by a schema embedded in the document being
    /// parsed, so an `import` of it needs no `schemaLocation`.
    pub fn declare_local_namespace<N: Into<String>>(&mut self, namespace: N) {
        self.local_namespaces.insert(namespace.into());
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous
    }

    pub fn walk(
        &mut self,
        schema: &XmlElement,
        target_namespace: &str,
        prefixes: &PrefixMap,
        source_id: &str,
        depth: usize,
    ) -> Result<SchemaWalk, Error> {
        let mut walk = SchemaWalk::default();

        if depth > self.options.max_depth {
            warn!(
                "Recursion depth {} reached at {}, skipping",
                self.options.max_depth, source_id
            );
            return Ok(walk);
        }

        let key = (target_namespace.to_owned(), source_id.to_owned());
        if !self.visited.insert(key) {
            debug!("Already walked {} for {}", source_id, target_namespace);
            return Ok(walk);
        }

        debug!("Walking {} for {}", source_id, target_namespace);

        let mut prefixes = prefixes.clone();
        prefixes.extend_from(schema);

        let scope = Scope {
            target_namespace,
            prefixes: &prefixes,
            source: source_id,
        };

        for child in &schema.children {
            match child.name.as_str() {
                "include" => {
                    let location = self.location(child, source_id)?;
                    let document = self.source.fetch(&location)?;
                    let prefixes = PrefixMap::from_element(&document.root);
                    let target_namespace = schema
                        .attribute("targetNamespace")
                        .unwrap_or(target_namespace);

                    walk.extend(self.walk(
                        &document.root,
                        target_namespace,
                        &prefixes,
                        &location,
                        depth + 1,
                    )?);
                }

                "import" => {
                    if child.attribute("schemaLocation").is_none()
                        && self.is_local_import(child)
                    {
                        continue;
                    }

                    let location = self.location(child, source_id)?;
                    let document = self.source.fetch(&location)?;
                    let prefixes = PrefixMap::from_element(&document.root);
                    let imported_namespace = document
                        .root
                        .attribute("targetNamespace")
                        .unwrap_or(target_namespace);

                    let imported = self.walk(
                        &document.root,
                        imported_namespace,
                        &prefixes,
                        &location,
                        depth + 1,
                    )?;

                    let declared = child.attribute("namespace").unwrap_or_default();
                    walk.extend(rebase_import(imported, declared, target_namespace));
                }

                "element" => {
                    let (element, types) = self.parse_element(child, scope)?;
                    walk.elements.push(element);
                    walk.types.extend(types);
                }

                "simpleType" | "complexType" => {
                    let (ty, nested) = self.parse_type(child, scope)?;
                    walk.types.push(ty);
                    walk.types.extend(nested);
                }

                _ => (),
            }
        }

        Ok(walk)
    }

    fn location(&self, node: &XmlElement, source_id: &str) -> Result<String, Error> {
        resolve_location(source_id, node.required_attribute("schemaLocation")?)
    }

    fn is_local_import(&self, node: &XmlElement) -> bool {
        match node.attribute("namespace") {
            Some(namespace) => {
                namespace == XML_SCHEMA || self.local_namespaces.contains(namespace)
            }
            None => false,
        }
    }

    fn anonymous_name(&mut self, namespace: &str) -> QualifiedName {
        let name = QualifiedName::new(namespace, format!("internal_{}", self.anonymous));
        self.anonymous += 1;
        name
    }

    /// Parses an `<element>`; an inline type is returned first in the list,
    /// followed by any types nested inside it.
    fn parse_element(
        &mut self,
        node: &XmlElement,
        scope: Scope<'_>,
    ) -> Result<(Element, Vec<ElementType>), Error> {
        let min_occurs = parse_occurs(node.attribute("minOccurs"));
        let max_occurs = parse_occurs(node.attribute("maxOccurs"));

        if let Some(reference) = node.attribute("ref") {
            let reference = scope
                .prefixes
                .expand_reference(reference, scope.target_namespace);

            let element = Element {
                source: scope.source.to_owned(),
                name: reference.clone(),
                content: ElementContent::Reference(reference),
                min_occurs,
                max_occurs,
            };

            return Ok((element, Vec::new()));
        }

        let name = expand(
            node.required_attribute("name")?,
            scope.prefixes,
            scope.target_namespace,
        );

        let mut types = Vec::new();

        let ty = if let Some(ty) = node.attribute("type") {
            scope.prefixes.expand_reference(ty, scope.target_namespace)
        } else if let Some(inline) = node
            .children
            .iter()
            .find(|child| matches!(child.name.as_str(), "simpleType" | "complexType"))
        {
            let (inline, nested) = self.parse_type(inline, scope)?;
            let name = inline.name.clone();
            types.push(inline);
            types.extend(nested);
            name
        } else {
            QualifiedName::new(XML_SCHEMA, "anyType")
        };

        let element = Element {
            source: scope.source.to_owned(),
            name,
            content: ElementContent::Typed(ty),
            min_occurs,
            max_occurs,
        };

        Ok((element, types))
    }

    /// Parses a `<simpleType>` or `<complexType>` into its shape, returning it
    /// together with the anonymous types declared inside it.
    fn parse_type(
        &mut self,
        node: &XmlElement,
        scope: Scope<'_>,
    ) -> Result<(ElementType, Vec<ElementType>), Error> {
        let (name, anonymous) = match node.attribute("name") {
            Some(name) => (expand(name, scope.prefixes, scope.target_namespace), false),
            None => (self.anonymous_name(scope.target_namespace), true),
        };

        let documentation = node
            .child("annotation")
            .and_then(|annotation| annotation.child("documentation"))
            .and_then(|documentation| documentation.text.clone());

        let mut nested = Vec::new();

        let shape = if node.name == "simpleType" {
            self.simple_shape(node, scope, &mut nested)?
        } else {
            let mut structure = Structure::default();
            self.collect_content(node, &mut structure, scope, &mut nested)?;

            if structure.is_empty() {
                TypeShape::Empty
            } else {
                TypeShape::Structural(structure)
            }
        };

        let ty = ElementType {
            source: scope.source.to_owned(),
            name,
            origin: None,
            anonymous,
            documentation,
            shape,
        };

        Ok((ty, nested))
    }

    fn simple_shape(
        &mut self,
        node: &XmlElement,
        scope: Scope<'_>,
        nested: &mut Vec<ElementType>,
    ) -> Result<TypeShape, Error> {
        let restriction = match node.child("restriction") {
            Some(restriction) => restriction,

            None if node.child("list").is_some() || node.child("union").is_some() => {
                return Ok(TypeShape::BuiltinAlias(BuiltIn::String))
            }

            None => return Ok(TypeShape::Empty),
        };

        let facets = Facets {
            enumeration: restriction
                .children_named("enumeration")
                .filter_map(|facet| facet.attribute("value"))
                .map(ToOwned::to_owned)
                .collect(),
            pattern: restriction
                .children_named("pattern")
                .filter_map(|facet| facet.attribute("value"))
                .last()
                .map(ToOwned::to_owned),
        };

        let base = match restriction.attribute("base") {
            Some(base) => scope
                .prefixes
                .expand_reference(base, scope.target_namespace),

            None => match restriction.child("simpleType") {
                Some(inline) => {
                    let (inline, inner) = self.parse_type(inline, scope)?;
                    let name = inline.name.clone();
                    nested.push(inline);
                    nested.extend(inner);
                    name
                }

                None => QualifiedName::new(XML_SCHEMA, "string"),
            },
        };

        Ok(TypeShape::Restriction { base, facets })
    }

    /// Consumes the content model children of a complex type or of one of
    /// its derivations. Every child is read exactly once.
    fn collect_content(
        &mut self,
        node: &XmlElement,
        structure: &mut Structure,
        scope: Scope<'_>,
        nested: &mut Vec<ElementType>,
    ) -> Result<(), Error> {
        for child in &node.children {
            match child.name.as_str() {
                "sequence" | "all" => {
                    self.collect_group(child, Group::Sequence, structure, scope, nested)?
                }

                "choice" => self.collect_group(child, Group::Choice, structure, scope, nested)?,

                "attribute" => {
                    let attribute = self.parse_attribute(child, scope, nested)?;
                    structure.attributes.push(attribute);
                }

                "complexContent" | "simpleContent" => {
                    for derivation in &child.children {
                        if !matches!(derivation.name.as_str(), "extension" | "restriction") {
                            continue;
                        }

                        let base = derivation
                            .attribute("base")
                            .map(|base| scope.prefixes.expand_reference(base, scope.target_namespace));

                        if child.name == "simpleContent" {
                            structure.content = base;
                        } else if derivation.name == "extension" {
                            structure.base = base
                                .filter(|base| BuiltIn::from_qualified(base).is_none());
                        }

                        self.collect_content(derivation, structure, scope, nested)?;
                    }
                }

                _ => (),
            }
        }

        Ok(())
    }

    fn collect_group(
        &mut self,
        node: &XmlElement,
        group: Group,
        structure: &mut Structure,
        scope: Scope<'_>,
        nested: &mut Vec<ElementType>,
    ) -> Result<(), Error> {
        for child in &node.children {
            match child.name.as_str() {
                "element" => {
                    let (element, types) = self.parse_element(child, scope)?;
                    nested.extend(types);

                    match group {
                        Group::Sequence => structure.sequence.push(element),
                        Group::Choice => structure.choice.push(element),
                    }
                }

                "sequence" => self.collect_group(child, group, structure, scope, nested)?,

                "choice" => self.collect_group(child, Group::Choice, structure, scope, nested)?,

                _ => (),
            }
        }

        Ok(())
    }

    fn parse_attribute(
        &mut self,
        node: &XmlElement,
        scope: Scope<'_>,
        nested: &mut Vec<ElementType>,
    ) -> Result<Attribute, Error> {
        let required = node.attribute("use") == Some("required");

        if let Some(reference) = node.attribute("ref") {
            let reference = scope
                .prefixes
                .expand_reference(reference, scope.target_namespace);

            return Ok(Attribute {
                name: reference.local,
                ty: QualifiedName::new(XML_SCHEMA, "string"),
                required,
            });
        }

        let name = node.required_attribute("name")?.to_owned();

        let ty = match (node.attribute("type"), node.child("simpleType")) {
            (Some(ty), _) => scope.prefixes.expand_reference(ty, scope.target_namespace),

            (None, Some(inline)) => {
                let (inline, inner) = self.parse_type(inline, scope)?;
                let name = inline.name.clone();
                nested.push(inline);
                nested.extend(inner);
                name
            }

            (None, None) => QualifiedName::new(XML_SCHEMA, "string"),
        };

        Ok(Attribute { name, ty, required })
    }
}

/// Imported declarations stay addressable under their own namespace and are
/// additionally registered under the importer's target namespace.
fn rebase_import(imported: SchemaWalk, declared: &str, target_namespace: &str) -> SchemaWalk {
    if declared.is_empty() {
        return imported;
    }

    let mut walk = SchemaWalk::default();

    for element in imported.elements {
        if let Some(name) = element.name.rebased(declared, target_namespace) {
            debug!("Import rewrites {} to {}", element.name, name);
            let mut alias = element.clone();
            alias.name = name;
            walk.elements.push(alias);
        }

        walk.elements.push(element);
    }

    for ty in imported.types {
        if let Some(name) = ty.name.rebased(declared, target_namespace) {
            debug!("Import rewrites {} to {}", ty.name, name);
            let mut alias = ty.clone();
            alias.origin = Some(ty.canonical_name().clone());
            alias.name = name;
            walk.types.push(alias);
        }

        walk.types.push(ty);
    }

    walk
}

/// `minOccurs`/`maxOccurs` value; absent or non-numeric input reads as 1.
fn parse_occurs(value: Option<&str>) -> u32 {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(1)
}
