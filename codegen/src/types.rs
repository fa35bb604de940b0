use whistler_wsdl::{builtin::BuiltIn, namespaces::QualifiedName};

/// Handle of a declaration inside an [`Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(BuiltIn),
    Declared(DeclarationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Element,
    Attribute,
    /// Text content of a `simpleContent` type.
    Text,
    /// Inherited base type whose fields are inlined.
    Flatten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// XML local name used on the wire.
    pub tag: String,
    pub ty: TypeRef,
    pub kind: FieldKind,
    pub optional: bool,
    /// Refers back to a declaration that was still being expanded.
    pub boxed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    Struct(Vec<Field>),
    Alias(TypeRef),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub qualified: QualifiedName,
    pub documentation: Vec<String>,
    pub kind: DeclarationKind,
}

/// Top-level name bound to the type of one message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartBinding {
    pub name: String,
    pub message: String,
    pub part: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Name of the emitted address constant.
    pub constant: String,
    pub port: String,
    pub binding: String,
    pub location: Option<String>,
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub name: String,
    /// Name of the emitted module.
    pub module: String,
    pub endpoints: Vec<Endpoint>,
}

/// Everything synthesized for one WSDL, ready to be emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub declarations: Vec<Declaration>,
    pub bindings: Vec<PartBinding>,
    pub services: Vec<ServiceEndpoints>,
}

impl DeclarationId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Output {
    pub fn declaration(&self, id: DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|declaration| declaration.name == name)
    }

    pub fn binding(&self, name: &str) -> Option<&PartBinding> {
        self.bindings.iter().find(|binding| binding.name == name)
    }

    /// Name of the declaration a type reference points at, if any.
    pub fn declared_name(&self, ty: TypeRef) -> Option<&str> {
        match ty {
            TypeRef::Declared(id) => self.declaration(id).map(|d| d.name.as_str()),
            TypeRef::Primitive(_) => None,
        }
    }
}
