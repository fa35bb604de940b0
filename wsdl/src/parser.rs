use tracing::{debug, info};

use super::{
    document::XmlElement,
    error::Error,
    namespaces::{expand, PrefixMap, QualifiedName, WSDL},
    schema::{SchemaWalk, WalkOptions, Walker},
    source::DocumentSource,
    table::TypeTable,
    types::{
        Binding, BindingOperation, BindingOperationComponent, Definition, Message, MessagePart,
        PartKind, Port, PortOperation, PortOperationComponent, Service, ServicePort,
    },
};

struct Parser<'a> {
    prefixes: &'a PrefixMap,
    target_namespace: &'a str,
}

impl<'a> Parser<'a> {
    fn is_wsdl(&self, element: &XmlElement) -> bool {
        let prefix = element.prefix.as_deref().unwrap_or_default();
        self.prefixes.get(prefix) == Some(WSDL)
    }

    fn wsdl_children<'e>(
        &'e self,
        root: &'e XmlElement,
        name: &'e str,
    ) -> impl Iterator<Item = &'e XmlElement> + 'e {
        root.children_named(name)
            .filter(move |child| self.is_wsdl(child))
    }

    fn qualified(&self, token: &str) -> QualifiedName {
        expand(token, self.prefixes, self.target_namespace)
    }

    fn parse_message(&self, node: &XmlElement) -> Result<Message, Error> {
        let name = node.required_attribute("name")?.to_owned();
        let mut parts = Vec::new();

        for part in node.children_named("part") {
            let (element, kind) = match (part.attribute("element"), part.attribute("type")) {
                (Some(element), _) => (element, PartKind::Element),
                (None, Some(ty)) => (ty, PartKind::Type),
                (None, None) => {
                    return Err(Error::MissingAttribute {
                        element: part.name.clone(),
                        attribute: "element",
                    })
                }
            };

            parts.push(MessagePart {
                name: part.required_attribute("name")?.to_owned(),
                element: self.qualified(element),
                kind,
            });
        }

        Ok(Message { name, parts })
    }

    fn parse_port_type(&self, node: &XmlElement) -> Result<Port, Error> {
        let name = node.required_attribute("name")?.to_owned();
        let mut operations = Vec::new();

        for operation in node.children_named("operation") {
            operations.push(PortOperation {
                name: operation.required_attribute("name")?.to_owned(),
                documentation: operation
                    .child("documentation")
                    .and_then(|documentation| documentation.text.clone()),
                input: self.port_component(operation.child("input")),
                output: self.port_component(operation.child("output")),
                fault: self.port_component(operation.child("fault")),
            });
        }

        Ok(Port { name, operations })
    }

    fn port_component(&self, node: Option<&XmlElement>) -> Option<PortOperationComponent> {
        let node = node?;

        Some(PortOperationComponent {
            message: self.qualified(node.attribute("message")?),
            name: node.attribute("name").map(ToOwned::to_owned),
        })
    }

    fn parse_binding(&self, node: &XmlElement) -> Result<Binding, Error> {
        let name = node.required_attribute("name")?.to_owned();
        let ty = self.qualified(node.required_attribute("type")?);

        let transport = node
            .child("binding")
            .and_then(|binding| binding.attribute("transport"))
            .map(ToOwned::to_owned);

        let mut operations = Vec::new();

        for operation in node.children_named("operation") {
            let soap = operation.child("operation");

            operations.push(BindingOperation {
                name: operation.required_attribute("name")?.to_owned(),
                soap_action: soap
                    .and_then(|soap| soap.attribute("soapAction"))
                    .map(ToOwned::to_owned),
                style: soap
                    .and_then(|soap| soap.attribute("style"))
                    .map(ToOwned::to_owned),
                input: binding_components(operation.child("input")),
                output: binding_components(operation.child("output")),
                fault: binding_components(operation.child("fault")),
            });
        }

        Ok(Binding {
            name,
            ty,
            transport,
            operations,
        })
    }

    fn parse_service(&self, node: &XmlElement) -> Result<Service, Error> {
        let name = node.required_attribute("name")?.to_owned();
        let mut ports = Vec::new();

        for port in node.children_named("port") {
            ports.push(ServicePort {
                name: port.required_attribute("name")?.to_owned(),
                binding: self.qualified(port.required_attribute("binding")?),
                address_location: port
                    .child("address")
                    .and_then(|address| address.attribute("location"))
                    .map(ToOwned::to_owned),
            });
        }

        Ok(Service { name, ports })
    }
}

fn binding_components(node: Option<&XmlElement>) -> Vec<BindingOperationComponent> {
    let node = match node {
        Some(node) => node,
        None => return Vec::new(),
    };

    node.children
        .iter()
        .map(|child| BindingOperationComponent {
            kind: child.name.clone(),
            usage: child.attribute("use").map(ToOwned::to_owned),
            parts: child
                .attributes
                .iter()
                .filter(|(key, _)| key == "part" || key == "parts")
                .flat_map(|(_, value)| value.split_whitespace().map(ToOwned::to_owned))
                .collect(),
            message: child.attribute("message").map(ToOwned::to_owned),
            name: child.attribute("name").map(ToOwned::to_owned),
        })
        .collect()
}

/// Parses the WSDL document `identifier`, walks every embedded schema and the
/// documents they reference, and builds the type table.
pub fn parse<S: DocumentSource + ?Sized>(
    source: &mut S,
    identifier: &str,
    options: WalkOptions,
) -> Result<Definition, Error> {
    info!("Parsing {}", identifier);

    let document = source.fetch(identifier)?;
    let root = &document.root;
    let prefixes = PrefixMap::from_element(root);

    if prefixes.prefix_of(WSDL).is_none() {
        return Err(Error::MissingNamespace(WSDL.into()));
    }

    let target_namespace = root.attribute("targetNamespace").unwrap_or_default();

    let parser = Parser {
        prefixes: &prefixes,
        target_namespace,
    };

    let schemas: Vec<&XmlElement> = parser
        .wsdl_children(root, "types")
        .flat_map(|types| types.children_named("schema"))
        .collect();

    let mut walk = SchemaWalk::default();
    {
        let mut walker = Walker::with_options(source, options);

        for schema in &schemas {
            if let Some(namespace) = schema.attribute("targetNamespace") {
                walker.declare_local_namespace(namespace);
            }
        }

        for (index, schema) in schemas.iter().enumerate() {
            let schema_namespace = schema
                .attribute("targetNamespace")
                .unwrap_or(target_namespace);

            let source_id = if index == 0 {
                identifier.to_owned()
            } else {
                format!("{}#schema{}", identifier, index)
            };

            walk.extend(walker.walk(schema, schema_namespace, &prefixes, &source_id, 0)?);
        }

        debug!(
            "Walked {} schemas: {} elements, {} types, {} anonymous",
            schemas.len(),
            walk.elements.len(),
            walk.types.len(),
            walker.anonymous_count()
        );
    }

    let messages = parser
        .wsdl_children(root, "message")
        .map(|node| parser.parse_message(node))
        .collect::<Result<Vec<_>, _>>()?;

    let port_types = parser
        .wsdl_children(root, "portType")
        .map(|node| parser.parse_port_type(node))
        .collect::<Result<Vec<_>, _>>()?;

    let bindings = parser
        .wsdl_children(root, "binding")
        .map(|node| parser.parse_binding(node))
        .collect::<Result<Vec<_>, _>>()?;

    let services = parser
        .wsdl_children(root, "service")
        .map(|node| parser.parse_service(node))
        .collect::<Result<Vec<_>, _>>()?;

    let table = TypeTable::build(target_namespace, &walk.elements, &walk.types)?;

    Ok(Definition {
        target_namespace: target_namespace.to_owned(),
        prefixes: prefixes.clone(),
        messages,
        port_types,
        bindings,
        services,
        elements: walk.elements,
        types: walk.types,
        table,
    })
}
