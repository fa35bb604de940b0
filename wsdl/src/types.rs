use super::{
    builtin::BuiltIn,
    error::{Error, ReferenceKind},
    namespaces::{PrefixMap, QualifiedName},
    table::TypeTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    /// Declared (or inline) type of the element.
    Typed(QualifiedName),
    /// `ref` to another top-level element.
    Reference(QualifiedName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub source: String,
    pub name: QualifiedName,
    pub content: ElementContent,
    pub min_occurs: u32,
    pub max_occurs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub enumeration: Vec<String>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub ty: QualifiedName,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    /// `complexContent` extension base whose fields are inherited.
    pub base: Option<QualifiedName>,
    /// `simpleContent` text value type.
    pub content: Option<QualifiedName>,
    pub sequence: Vec<Element>,
    pub choice: Vec<Element>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Terminal alias of a primitive (`list`/`union` simple types).
    BuiltinAlias(BuiltIn),
    /// Restriction of a primitive or of another named type.
    Restriction { base: QualifiedName, facets: Facets },
    Structural(Structure),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementType {
    pub source: String,
    pub name: QualifiedName,
    /// Name the type was declared under, when an import registered it
    /// again under the importer's namespace.
    pub origin: Option<QualifiedName>,
    pub anonymous: bool,
    pub documentation: Option<String>,
    pub shape: TypeShape,
}

impl ElementType {
    /// Declared name, shared by every registration of the same type.
    pub fn canonical_name(&self) -> &QualifiedName {
        self.origin.as_ref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Element,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePart {
    pub name: String,
    pub element: QualifiedName,
    pub kind: PartKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOperationComponent {
    pub message: QualifiedName,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOperation {
    pub name: String,
    pub documentation: Option<String>,
    pub input: Option<PortOperationComponent>,
    pub output: Option<PortOperationComponent>,
    pub fault: Option<PortOperationComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub operations: Vec<PortOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOperationComponent {
    pub kind: String,
    pub usage: Option<String>,
    pub parts: Vec<String>,
    pub message: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: Option<String>,
    pub style: Option<String>,
    pub input: Vec<BindingOperationComponent>,
    pub output: Vec<BindingOperationComponent>,
    pub fault: Vec<BindingOperationComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub ty: QualifiedName,
    pub transport: Option<String>,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePort {
    pub name: String,
    pub binding: QualifiedName,
    pub address_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub ports: Vec<ServicePort>,
}

/// Everything read from one WSDL document and the schemas it pulls in.
#[derive(Debug, Clone)]
pub struct Definition {
    pub target_namespace: String,
    pub prefixes: PrefixMap,

    pub messages: Vec<Message>,
    pub port_types: Vec<Port>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,

    pub elements: Vec<Element>,
    pub types: Vec<ElementType>,
    pub table: TypeTable,
}

impl Element {
    pub fn is_reference(&self) -> bool {
        matches!(self.content, ElementContent::Reference(_))
    }
}

impl Structure {
    pub fn is_empty(&self) -> bool {
        self.base.is_none()
            && self.content.is_none()
            && self.sequence.is_empty()
            && self.choice.is_empty()
            && self.attributes.is_empty()
    }
}

impl Definition {
    pub fn find_binding(&self, name: &QualifiedName) -> Result<&Binding, Error> {
        self.bindings
            .iter()
            .find(|binding| binding.name == name.local)
            .ok_or_else(|| Error::unresolved(ReferenceKind::Binding, name))
    }

    pub fn find_port_type(&self, name: &QualifiedName) -> Result<&Port, Error> {
        self.port_types
            .iter()
            .find(|port| port.name == name.local)
            .ok_or_else(|| Error::unresolved(ReferenceKind::PortType, name))
    }

    pub fn find_message(&self, name: &QualifiedName) -> Result<&Message, Error> {
        self.messages
            .iter()
            .find(|message| message.name == name.local)
            .ok_or_else(|| Error::unresolved(ReferenceKind::Message, name))
    }
}
