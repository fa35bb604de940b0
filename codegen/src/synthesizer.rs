//! Turns resolved schema types into named declarations.
//!
//! Every type reachable from a message part is synthesized exactly once and
//! memoized by its declared qualified name, so a type an import registers
//! under two namespaces still yields one declaration. Fields pointing back at a declaration that
//! is still being expanded are boxed, so recursive schemas stay finite.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};
use whistler_wsdl::{
    builtin::BuiltIn,
    error::{Error as WsdlError, ReferenceKind},
    namespaces::{QualifiedName, TableKey},
    table::TypeTable,
    types::{
        Definition, Element, ElementContent, ElementType, Facets, Message, PartKind, Service,
        Structure, TypeShape,
    },
};

use super::{
    error::{Error, Result},
    naming,
    types::{
        Declaration, DeclarationId, DeclarationKind, Endpoint, Field, FieldKind, Output,
        PartBinding, ServiceEndpoints, TypeRef,
    },
};

pub struct Synthesizer<'t> {
    table: &'t TypeTable,
    declarations: Vec<Declaration>,
    resolved: HashMap<TableKey, DeclarationId>,
    in_progress: HashSet<DeclarationId>,
    bindings: Vec<PartBinding>,
    services: Vec<ServiceEndpoints>,
}

/// Synthesizes every message part and service of `definition`.
pub fn synthesize_definition(definition: &Definition) -> Result<Output> {
    let mut synthesizer = Synthesizer::new(&definition.table);

    for message in &definition.messages {
        synthesizer.synthesize_message(message)?;
    }

    for service in &definition.services {
        synthesizer.synthesize_service(definition, service)?;
    }

    let output = synthesizer.finish();
    info!(
        "Synthesized {} declarations and {} bindings",
        output.declarations.len(),
        output.bindings.len()
    );

    Ok(output)
}

impl<'t> Synthesizer<'t> {
    pub fn new(table: &'t TypeTable) -> Self {
        Self {
            table,
            declarations: Vec::new(),
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
            bindings: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Type reference for a schema type name.
    pub fn synthesize(&mut self, name: &QualifiedName) -> Result<TypeRef> {
        self.synthesize_named(name, None)
    }

    /// Type reference for a top-level element name.
    pub fn synthesize_element(&mut self, name: &QualifiedName) -> Result<TypeRef> {
        let table = self.table;

        if let Some(primitive) = table.primitive_element(name) {
            return Ok(TypeRef::Primitive(primitive));
        }

        match table.element(name) {
            Some(ty) => self.synthesize_type(ty, Some(name.local.as_str())),
            None => Err(WsdlError::unresolved(ReferenceKind::Element, name).into()),
        }
    }

    pub fn synthesize_message(&mut self, message: &Message) -> Result<()> {
        for part in &message.parts {
            info!("Building part {} of message {}", part.name, message.name);

            let ty = match part.kind {
                PartKind::Element => self.synthesize_element(&part.element)?,
                PartKind::Type => self.synthesize(&part.element)?,
            };

            let name = naming::unique(naming::binding_name(&message.name, &part.name), |n| {
                self.bindings.iter().any(|binding| binding.name == n)
            });

            self.bindings.push(PartBinding {
                name,
                message: message.name.clone(),
                part: part.name.clone(),
                ty,
            });
        }

        Ok(())
    }

    /// Resolves each port's binding, its port type and the messages of its
    /// operations, recording the port address.
    pub fn synthesize_service(&mut self, definition: &Definition, service: &Service) -> Result<()> {
        let mut endpoints = Vec::new();

        for port in &service.ports {
            let binding = definition.find_binding(&port.binding)?;
            let port_type = definition.find_port_type(&binding.ty)?;

            for operation in &port_type.operations {
                for component in [&operation.input, &operation.output, &operation.fault]
                    .into_iter()
                    .flatten()
                {
                    definition.find_message(&component.message)?;
                }
            }

            debug!(
                "Port {} of {} uses binding {} ({} operations)",
                port.name,
                service.name,
                binding.name,
                port_type.operations.len()
            );

            let constant = naming::unique(naming::const_name(&port.name), |n| {
                endpoints.iter().any(|endpoint: &Endpoint| endpoint.constant == n)
            });

            endpoints.push(Endpoint {
                constant,
                port: port.name.clone(),
                binding: binding.name.clone(),
                location: port.address_location.clone(),
                operations: port_type
                    .operations
                    .iter()
                    .map(|operation| operation.name.clone())
                    .collect(),
            });
        }

        let module = naming::unique(naming::module_name(&service.name), |n| {
            self.services.iter().any(|service| service.module == n)
        });

        self.services.push(ServiceEndpoints {
            name: service.name.clone(),
            module,
            endpoints,
        });

        Ok(())
    }

    pub fn finish(self) -> Output {
        Output {
            declarations: self.declarations,
            bindings: self.bindings,
            services: self.services,
        }
    }

    fn synthesize_named(&mut self, name: &QualifiedName, hint: Option<&str>) -> Result<TypeRef> {
        if let Some(primitive) = BuiltIn::from_qualified(name) {
            return Ok(TypeRef::Primitive(primitive));
        }

        let table = self.table;
        let ty = table.resolve(name)?;
        self.synthesize_type(ty, hint)
    }

    /// `hint` names anonymous types after the element that holds them.
    fn synthesize_type(&mut self, ty: &'t ElementType, hint: Option<&str>) -> Result<TypeRef> {
        if let Some(id) = self.resolved.get(&ty.canonical_name().key()) {
            return Ok(TypeRef::Declared(*id));
        }

        let structure = match &ty.shape {
            TypeShape::BuiltinAlias(primitive) => return Ok(TypeRef::Primitive(*primitive)),

            TypeShape::Restriction { base, facets } => {
                return self.synthesize_restriction(ty, hint, base, facets)
            }

            TypeShape::Empty => {
                let id = self.allocate(ty, hint, documentation(ty));
                self.complete(id, DeclarationKind::Empty);
                return Ok(TypeRef::Declared(id));
            }

            TypeShape::Structural(structure) => structure,
        };

        trace!("Expanding {}", ty.name);

        let id = self.allocate(ty, hint, documentation(ty));
        let fields = self.fields(structure)?;
        self.complete(id, DeclarationKind::Struct(fields));

        Ok(TypeRef::Declared(id))
    }

    fn synthesize_restriction(
        &mut self,
        ty: &'t ElementType,
        hint: Option<&str>,
        base: &QualifiedName,
        facets: &Facets,
    ) -> Result<TypeRef> {
        let mut documentation = documentation(ty);

        if !facets.enumeration.is_empty() {
            let values = facets
                .enumeration
                .iter()
                .map(|value| format!("`{}`", value))
                .collect::<Vec<_>>();
            documentation.push(format!("Allowed values: {}", values.join(", ")));
        }

        if let Some(pattern) = &facets.pattern {
            documentation.push(format!("Pattern: `{}`", pattern));
        }

        let id = self.allocate(ty, hint, documentation);
        let target = self.synthesize(base)?;

        if self.alias_target(target) == TypeRef::Declared(id) {
            return Err(Error::CyclicAlias(ty.name.to_string()));
        }

        self.complete(id, DeclarationKind::Alias(target));
        Ok(TypeRef::Declared(id))
    }

    fn fields(&mut self, structure: &'t Structure) -> Result<Vec<Field>> {
        let mut fields = Vec::new();

        if let Some(base) = &structure.base {
            let ty = self.synthesize(base)?;
            fields.push(self.field("base", "base", ty, FieldKind::Flatten, false));
        }

        if let Some(content) = &structure.content {
            let ty = self.synthesize(content)?;
            fields.push(self.field("value", "$value", ty, FieldKind::Text, false));
        }

        for element in &structure.sequence {
            fields.push(self.element_field(element, false)?);
        }

        for element in &structure.choice {
            fields.push(self.element_field(element, true)?);
        }

        for attribute in &structure.attributes {
            let ty = self.synthesize(&attribute.ty)?;
            fields.push(self.field(
                &attribute.name,
                &attribute.name,
                ty,
                FieldKind::Attribute,
                !attribute.required,
            ));
        }

        let mut seen: HashSet<String> = HashSet::new();
        for field in &mut fields {
            let name = naming::unique(field.name.clone(), |n| seen.contains(n));
            seen.insert(name.clone());
            field.name = name;
        }

        Ok(fields)
    }

    fn element_field(&mut self, element: &'t Element, optional: bool) -> Result<Field> {
        let local = element.name.local.as_str();

        let ty = match &element.content {
            ElementContent::Typed(ty) => self.synthesize_named(ty, Some(local))?,
            ElementContent::Reference(reference) => self.synthesize_element(reference)?,
        };

        Ok(self.field(local, local, ty, FieldKind::Element, optional))
    }

    fn field(&self, name: &str, tag: &str, ty: TypeRef, kind: FieldKind, optional: bool) -> Field {
        let boxed = self.needs_box(ty);

        if boxed {
            trace!("Boxing recursive field {}", name);
        }

        Field {
            name: naming::field_name(name),
            tag: tag.to_owned(),
            ty,
            kind,
            optional: optional || boxed,
            boxed,
        }
    }

    fn allocate(
        &mut self,
        ty: &ElementType,
        hint: Option<&str>,
        documentation: Vec<String>,
    ) -> DeclarationId {
        let local = match hint {
            Some(hint) if ty.anonymous => hint,
            _ => &ty.name.local,
        };

        let declarations = &self.declarations;
        let name = naming::unique(naming::type_name(local), |n| {
            naming::RESERVED_TYPES.contains(&n)
                || declarations.iter().any(|declaration| declaration.name == n)
        });

        let qualified = ty.canonical_name().clone();
        let id = DeclarationId(self.declarations.len());
        debug!("Declaring {} as {}", qualified, name);

        self.resolved.insert(qualified.key(), id);
        self.declarations.push(Declaration {
            name,
            qualified,
            documentation,
            kind: DeclarationKind::Empty,
        });
        self.in_progress.insert(id);

        id
    }

    fn complete(&mut self, id: DeclarationId, kind: DeclarationKind) {
        self.declarations[id.0].kind = kind;
        self.in_progress.remove(&id);
    }

    /// Follows alias declarations down to the type they finally name.
    fn alias_target(&self, mut ty: TypeRef) -> TypeRef {
        for _ in 0..=self.declarations.len() {
            match ty {
                TypeRef::Declared(id) => match &self.declarations[id.0].kind {
                    DeclarationKind::Alias(next) => ty = *next,
                    _ => break,
                },
                TypeRef::Primitive(_) => break,
            }
        }

        ty
    }

    fn needs_box(&self, ty: TypeRef) -> bool {
        match self.alias_target(ty) {
            TypeRef::Declared(id) => self.in_progress.contains(&id),
            TypeRef::Primitive(_) => false,
        }
    }
}

fn documentation(ty: &ElementType) -> Vec<String> {
    ty.documentation.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use whistler_wsdl::{schema::WalkOptions, source::StaticSource};

    fn wsdl(schema: &str, messages: &str) -> String {
        format!(
            r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                                 xmlns:xs="http://www.w3.org/2001/XMLSchema"
                                 xmlns:tns="urn:t"
                                 targetNamespace="urn:t">
                <wsdl:types>
                    <xs:schema targetNamespace="urn:t">{}</xs:schema>
                </wsdl:types>
                {}
            </wsdl:definitions>"#,
            schema, messages
        )
    }

    fn message(name: &str, element: &str) -> String {
        format!(
            r#"<wsdl:message name="{}"><wsdl:part name="body" element="tns:{}"/></wsdl:message>"#,
            name, element
        )
    }

    fn definition(xml: String) -> Definition {
        let mut source = StaticSource::new().with("test.wsdl", xml);
        whistler_wsdl::parse_with(&mut source, "test.wsdl", WalkOptions::default()).unwrap()
    }

    fn fields<'o>(output: &'o Output, name: &str) -> &'o [Field] {
        match &output.find(name).unwrap().kind {
            DeclarationKind::Struct(fields) => fields,
            other => panic!("{} is not a struct: {:?}", name, other),
        }
    }

    #[test]
    fn sequence_and_choice_fields() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="ItemRequest">
                <xs:sequence>
                    <xs:element name="id" type="xs:string"/>
                    <xs:choice><xs:element ref="tns:Extra"/></xs:choice>
                </xs:sequence>
            </xs:complexType>
            <xs:complexType name="Extra">
                <xs:sequence><xs:element name="note" type="xs:string"/></xs:sequence>
            </xs:complexType>
            <xs:element name="ItemRequest" type="tns:ItemRequest"/>
            <xs:element name="Extra" type="tns:Extra"/>"#,
            &message("GetItem", "ItemRequest"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        let extra = output.find("Extra").unwrap();

        assert_eq!(
            fields(&output, "ItemRequest"),
            &[
                Field {
                    name: "id".into(),
                    tag: "id".into(),
                    ty: TypeRef::Primitive(BuiltIn::String),
                    kind: FieldKind::Element,
                    optional: false,
                    boxed: false,
                },
                Field {
                    name: "extra".into(),
                    tag: "Extra".into(),
                    ty: TypeRef::Declared(DeclarationId(1)),
                    kind: FieldKind::Element,
                    optional: true,
                    boxed: false,
                },
            ]
        );
        assert_eq!(extra.qualified, QualifiedName::new("urn:t", "Extra"));

        let binding = output.binding("GetItem_body").unwrap();
        assert_eq!(output.declared_name(binding.ty), Some("ItemRequest"));
    }

    #[test]
    fn anonymous_types_take_the_element_name() {
        let definition = definition(wsdl(
            r#"<xs:element name="Order">
                <xs:complexType>
                    <xs:sequence>
                        <xs:element name="line">
                            <xs:complexType>
                                <xs:sequence><xs:element name="sku" type="xs:string"/></xs:sequence>
                            </xs:complexType>
                        </xs:element>
                    </xs:sequence>
                </xs:complexType>
            </xs:element>"#,
            &message("Submit", "Order"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        let names = output
            .declarations
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Order", "Line"]);
        assert!(output.declarations[0].qualified.local.starts_with("internal_"));
    }

    #[test]
    fn self_reference_is_boxed() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Node">
                <xs:sequence>
                    <xs:element name="label" type="xs:string"/>
                    <xs:element name="next" type="tns:Node"/>
                </xs:sequence>
            </xs:complexType>
            <xs:element name="Node" type="tns:Node"/>"#,
            &message("Walk", "Node"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        let next = &fields(&output, "Node")[1];

        assert_eq!(output.declarations.len(), 1);
        assert!(next.boxed);
        assert!(next.optional);
    }

    #[test]
    fn mutual_recursion_boxes_the_back_edge() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Parent">
                <xs:sequence><xs:element name="child" type="tns:Child"/></xs:sequence>
            </xs:complexType>
            <xs:complexType name="Child">
                <xs:sequence><xs:element name="parent" type="tns:Parent"/></xs:sequence>
            </xs:complexType>
            <xs:element name="Parent" type="tns:Parent"/>"#,
            &message("Family", "Parent"),
        ));

        let output = synthesize_definition(&definition).unwrap();

        assert!(!fields(&output, "Parent")[0].boxed);
        assert!(fields(&output, "Child")[0].boxed);
    }

    #[test]
    fn restrictions_become_documented_aliases() {
        let definition = definition(wsdl(
            r#"<xs:simpleType name="Status">
                <xs:restriction base="xs:string">
                    <xs:enumeration value="open"/>
                    <xs:enumeration value="closed"/>
                </xs:restriction>
            </xs:simpleType>
            <xs:simpleType name="Code">
                <xs:restriction base="tns:Status"><xs:pattern value="[a-z]+"/></xs:restriction>
            </xs:simpleType>
            <xs:element name="Code" type="tns:Code"/>"#,
            &message("Check", "Code"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        let code = output.find("Code").unwrap();
        let status = output.find("Status").unwrap();

        assert_eq!(status.kind, DeclarationKind::Alias(TypeRef::Primitive(BuiltIn::String)));
        assert_eq!(status.documentation, vec!["Allowed values: `open`, `closed`"]);

        let target = match code.kind {
            DeclarationKind::Alias(target) => target,
            ref other => panic!("Code is not an alias: {:?}", other),
        };
        assert_eq!(output.declared_name(target), Some("Status"));
        assert_eq!(code.documentation, vec!["Pattern: `[a-z]+`"]);
    }

    #[test]
    fn cyclic_restriction_is_rejected() {
        let definition = definition(wsdl(
            r#"<xs:simpleType name="A"><xs:restriction base="tns:B"/></xs:simpleType>
            <xs:simpleType name="B"><xs:restriction base="tns:A"/></xs:simpleType>
            <xs:element name="A" type="tns:A"/>"#,
            &message("Loop", "A"),
        ));

        match synthesize_definition(&definition) {
            Err(Error::CyclicAlias(name)) => assert_eq!(name, "urn:t:A"),
            other => panic!("expected a cyclic alias, got {:?}", other),
        }
    }

    #[test]
    fn lists_are_emitted_as_primitives() {
        let definition = definition(wsdl(
            r#"<xs:simpleType name="Numbers"><xs:list itemType="xs:int"/></xs:simpleType>
            <xs:element name="Numbers" type="tns:Numbers"/>"#,
            &message("Sum", "Numbers"),
        ));

        let output = synthesize_definition(&definition).unwrap();

        assert!(output.declarations.is_empty());
        assert_eq!(output.bindings[0].ty, TypeRef::Primitive(BuiltIn::String));
    }

    #[test]
    fn extension_and_simple_content() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Base">
                <xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence>
            </xs:complexType>
            <xs:complexType name="Derived">
                <xs:complexContent>
                    <xs:extension base="tns:Base">
                        <xs:sequence><xs:element name="amount" type="tns:Amount"/></xs:sequence>
                    </xs:extension>
                </xs:complexContent>
            </xs:complexType>
            <xs:complexType name="Amount">
                <xs:simpleContent>
                    <xs:extension base="xs:decimal">
                        <xs:attribute name="currency" type="xs:string" use="required"/>
                        <xs:attribute name="type" type="xs:string"/>
                    </xs:extension>
                </xs:simpleContent>
            </xs:complexType>
            <xs:element name="Derived" type="tns:Derived"/>"#,
            &message("Pay", "Derived"),
        ));

        let output = synthesize_definition(&definition).unwrap();

        let derived = fields(&output, "Derived");
        assert_eq!(derived[0].kind, FieldKind::Flatten);
        assert_eq!(output.declared_name(derived[0].ty), Some("Base"));

        let amount = fields(&output, "Amount");
        let summary = amount
            .iter()
            .map(|field| (field.name.as_str(), field.tag.as_str(), field.kind, field.optional))
            .collect::<Vec<_>>();

        assert_eq!(
            summary,
            vec![
                ("value", "$value", FieldKind::Text, false),
                ("currency", "currency", FieldKind::Attribute, false),
                ("type_", "type", FieldKind::Attribute, true),
            ]
        );
        assert_eq!(amount[0].ty, TypeRef::Primitive(BuiltIn::Decimal));
    }

    #[test]
    fn empty_types_are_declared() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Nothing"/>
            <xs:element name="Nothing" type="tns:Nothing"/>"#,
            &message("Noop", "Nothing"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        assert_eq!(output.find("Nothing").unwrap().kind, DeclarationKind::Empty);
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let definition = definition(
            r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                                 xmlns:xs="http://www.w3.org/2001/XMLSchema"
                                 xmlns:a="urn:a" xmlns:b="urn:b"
                                 targetNamespace="urn:a">
                <wsdl:types>
                    <xs:schema targetNamespace="urn:a">
                        <xs:complexType name="Item">
                            <xs:sequence>
                                <xs:element name="other" type="b:Item"/>
                                <xs:element name="text" type="a:String"/>
                            </xs:sequence>
                        </xs:complexType>
                        <xs:simpleType name="String"><xs:restriction base="xs:string"/></xs:simpleType>
                        <xs:element name="Item" type="a:Item"/>
                    </xs:schema>
                    <xs:schema targetNamespace="urn:b">
                        <xs:complexType name="Item">
                            <xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence>
                        </xs:complexType>
                    </xs:schema>
                </wsdl:types>
                <wsdl:message name="Get"><wsdl:part name="item" element="a:Item"/></wsdl:message>
            </wsdl:definitions>"#
                .to_owned(),
        );

        let output = synthesize_definition(&definition).unwrap();
        let names = output
            .declarations
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Item", "Item2", "String2"]);
    }

    #[test]
    fn primitive_elements_bind_directly() {
        let definition = definition(wsdl(
            r#"<xs:element name="Ping" type="xs:string"/>"#,
            &message("ping", "Ping"),
        ));

        let output = synthesize_definition(&definition).unwrap();

        assert_eq!(
            output.bindings,
            vec![PartBinding {
                name: "Ping_body".into(),
                message: "ping".into(),
                part: "body".into(),
                ty: TypeRef::Primitive(BuiltIn::String),
            }]
        );
    }

    #[test]
    fn unknown_element_names_the_reference() {
        let definition = definition(wsdl("", &message("Lost", "Missing")));

        match synthesize_definition(&definition) {
            Err(Error::Wsdl(WsdlError::UnresolvedReference { kind, name })) => {
                assert_eq!(kind, ReferenceKind::Element);
                assert_eq!(name, "urn:t:Missing");
            }
            other => panic!("expected an unresolved element, got {:?}", other),
        }
    }

    #[test]
    fn dangling_service_binding_fails() {
        let definition = definition(wsdl(
            "",
            r#"<wsdl:service name="Svc">
                <wsdl:port name="Port" binding="tns:Nowhere"/>
            </wsdl:service>"#,
        ));

        match synthesize_definition(&definition) {
            Err(Error::Wsdl(WsdlError::UnresolvedReference { kind, .. })) => {
                assert_eq!(kind, ReferenceKind::Binding)
            }
            other => panic!("expected an unresolved binding, got {:?}", other),
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="A">
                <xs:sequence>
                    <xs:element name="b" type="tns:B"/>
                    <xs:element name="c" type="tns:C"/>
                </xs:sequence>
            </xs:complexType>
            <xs:complexType name="B"><xs:sequence><xs:element name="a" type="tns:A"/></xs:sequence></xs:complexType>
            <xs:complexType name="C"/>
            <xs:element name="A" type="tns:A"/>"#,
            &message("Go", "A"),
        ));

        let first = synthesize_definition(&definition).unwrap();
        let second = synthesize_definition(&definition).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn element_part_uses_the_element_type_over_a_same_named_type() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Item">
                <xs:sequence><xs:element name="other" type="xs:int"/></xs:sequence>
            </xs:complexType>
            <xs:element name="Item">
                <xs:complexType>
                    <xs:sequence><xs:element name="sku" type="xs:string"/></xs:sequence>
                </xs:complexType>
            </xs:element>"#,
            &message("Get", "Item"),
        ));

        let output = synthesize_definition(&definition).unwrap();
        let binding = output.binding("Get_body").unwrap();

        let declaration = match binding.ty {
            TypeRef::Declared(id) => output.declaration(id).unwrap(),
            other => panic!("expected a declared type, got {:?}", other),
        };
        let names = match &declaration.kind {
            DeclarationKind::Struct(fields) => {
                fields.iter().map(|field| field.name.as_str()).collect::<Vec<_>>()
            }
            other => panic!("expected a struct, got {:?}", other),
        };

        assert_eq!(names, vec!["sku"]);
        assert!(declaration.qualified.local.starts_with("internal_"));
    }

    #[test]
    fn imported_type_is_declared_once_under_both_namespaces() {
        let mut source = StaticSource::new()
            .with(
                "test.wsdl",
                r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                                     xmlns:xs="http://www.w3.org/2001/XMLSchema"
                                     xmlns:a="urn:a" xmlns:b="urn:b"
                                     targetNamespace="urn:b">
                    <wsdl:types>
                        <xs:schema targetNamespace="urn:b">
                            <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
                            <xs:complexType name="Bar">
                                <xs:sequence>
                                    <xs:element name="x" type="a:Foo"/>
                                    <xs:element name="y" type="b:Foo"/>
                                </xs:sequence>
                            </xs:complexType>
                            <xs:element name="Bar" type="b:Bar"/>
                        </xs:schema>
                    </wsdl:types>
                    <wsdl:message name="Send"><wsdl:part name="body" element="b:Bar"/></wsdl:message>
                </wsdl:definitions>"#,
            )
            .with(
                "a.xsd",
                r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
                    <xs:complexType name="Foo">
                        <xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence>
                    </xs:complexType>
                </xs:schema>"#,
            );

        let definition =
            whistler_wsdl::parse_with(&mut source, "test.wsdl", WalkOptions::default()).unwrap();
        let output = synthesize_definition(&definition).unwrap();

        let summary = output
            .declarations
            .iter()
            .map(|declaration| (declaration.name.as_str(), declaration.qualified.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![("Bar", "urn:b:Bar".to_owned()), ("Foo", "urn:a:Foo".to_owned())]
        );

        let bar = fields(&output, "Bar");
        assert_eq!(bar[0].ty, bar[1].ty);
    }

    #[test]
    fn repeated_synthesis_returns_the_same_declaration() {
        let definition = definition(wsdl(
            r#"<xs:complexType name="Node">
                <xs:sequence><xs:element name="next" type="tns:Node"/></xs:sequence>
            </xs:complexType>"#,
            "",
        ));

        let mut synthesizer = Synthesizer::new(&definition.table);
        let name = QualifiedName::new("urn:t", "Node");

        let first = synthesizer.synthesize(&name).unwrap();
        let second = synthesizer.synthesize(&QualifiedName::new("URN:T", "node")).unwrap();

        assert_eq!(first, TypeRef::Declared(DeclarationId(0)));
        assert_eq!(first, second);
        assert_eq!(synthesizer.finish().declarations.len(), 1);
    }

    #[test]
    fn colliding_service_and_port_names_get_suffixes() {
        let definition = definition(wsdl(
            "",
            r#"<wsdl:portType name="Port"/>
            <wsdl:binding name="Binding" type="tns:Port"/>
            <wsdl:service name="ItemsService" xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/">
                <wsdl:port name="ItemsSoap" binding="tns:Binding">
                    <soap:address location="http://example.com/a"/>
                </wsdl:port>
                <wsdl:port name="Items_Soap" binding="tns:Binding">
                    <soap:address location="http://example.com/b"/>
                </wsdl:port>
            </wsdl:service>
            <wsdl:service name="items_service"/>"#,
        ));

        let output = synthesize_definition(&definition).unwrap();

        let modules = output
            .services
            .iter()
            .map(|service| service.module.as_str())
            .collect::<Vec<_>>();
        let constants = output.services[0]
            .endpoints
            .iter()
            .map(|endpoint| endpoint.constant.as_str())
            .collect::<Vec<_>>();

        assert_eq!(modules, vec!["items_service", "items_service2"]);
        assert_eq!(constants, vec!["ITEMS_SOAP", "ITEMS_SOAP2"]);
    }
}
