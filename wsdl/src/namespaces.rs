use std::{collections::HashMap, fmt};

use super::document::XmlElement;

pub const XML_SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";
pub const WSDL: &str = "http://schemas.xmlsoap.org/wsdl/";

/// Splits `prefix:local` on the first colon.
pub fn split_qualified(prefixed_name: &str) -> (Option<&str>, &str) {
    match prefixed_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, prefixed_name),
    }
}

/// A `namespace:local` pair. The namespace may be empty when a prefix could
/// not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub local: String,
}

/// Case-insensitive lookup key of a [`QualifiedName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey(String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap(HashMap<String, String>);

impl QualifiedName {
    pub fn new<N: Into<String>, L: Into<String>>(namespace: N, local: L) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    pub fn key(&self) -> TableKey {
        TableKey(self.to_string().to_lowercase())
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.eq_ignore_ascii_case(namespace)
    }

    /// Moves this name into `to` when it currently lives in `from`.
    pub fn rebased(&self, from: &str, to: &str) -> Option<Self> {
        if self.namespace == from && from != to {
            Some(Self::new(to, self.local.clone()))
        } else {
            None
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local)
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PrefixMap {
    /// Prefix table declared on `element`, normally a document root.
    pub fn from_element(element: &XmlElement) -> Self {
        let mut prefixes = Self::default();
        prefixes.extend_from(element);
        prefixes
    }

    /// Adds the declarations of a nested element, shadowing existing prefixes.
    pub fn extend_from(&mut self, element: &XmlElement) {
        for (prefix, namespace) in element.namespace_declarations() {
            self.insert(prefix, namespace);
        }
    }

    pub fn insert<P: Into<String>, N: Into<String>>(&mut self, prefix: P, namespace: N) {
        self.0.insert(prefix.into(), namespace.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.get("")
    }

    /// Prefix bound to `namespace`, if any.
    pub fn prefix_of(&self, namespace: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(_, value)| value.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
            .min()
    }

    /// Expands a QName-valued attribute (`type`, `ref`, `base`, ...). Unprefixed
    /// references use the document's default namespace, then `target`.
    pub fn expand_reference(&self, token: &str, target: &str) -> QualifiedName {
        expand(token, self, self.default_namespace().unwrap_or(target))
    }
}

/// Expands `prefix:local` through `prefixes`. A token without a colon lives in
/// `default_namespace`; an undeclared prefix yields an empty namespace.
pub fn expand(token: &str, prefixes: &PrefixMap, default_namespace: &str) -> QualifiedName {
    match split_qualified(token) {
        (Some(prefix), local) => {
            QualifiedName::new(prefixes.get(prefix).unwrap_or_default(), local)
        }
        (None, local) => QualifiedName::new(default_namespace, local),
    }
}
