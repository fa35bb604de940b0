use super::namespaces::{QualifiedName, XML_SCHEMA};

/// XML-Schema primitive types. References to these terminate resolution and
/// never need an entry in the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltIn {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Integer,
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
    UnsignedLong,
    NonNegativeInteger,
    Decimal,
    Float,
    Double,
    Date,
    DateTime,
    Time,
    Duration,
    Base64Binary,
    HexBinary,
    AnyType,
}

impl BuiltIn {
    pub fn from_local(local: &str) -> Option<Self> {
        let builtin = match local {
            "string" | "normalizedString" | "token" | "language" | "Name" | "NCName"
            | "NMTOKEN" | "NMTOKENS" | "ID" | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES"
            | "anyURI" | "QName" | "NOTATION" | "gYear" | "gYearMonth" | "gMonth"
            | "gMonthDay" | "gDay" => BuiltIn::String,
            "boolean" => BuiltIn::Boolean,
            "byte" => BuiltIn::Byte,
            "short" => BuiltIn::Short,
            "int" => BuiltIn::Int,
            "long" => BuiltIn::Long,
            "integer" | "negativeInteger" | "nonPositiveInteger" => BuiltIn::Integer,
            "unsignedByte" => BuiltIn::UnsignedByte,
            "unsignedShort" => BuiltIn::UnsignedShort,
            "unsignedInt" => BuiltIn::UnsignedInt,
            "unsignedLong" => BuiltIn::UnsignedLong,
            "nonNegativeInteger" | "positiveInteger" => BuiltIn::NonNegativeInteger,
            "decimal" => BuiltIn::Decimal,
            "float" => BuiltIn::Float,
            "double" => BuiltIn::Double,
            "date" => BuiltIn::Date,
            "dateTime" => BuiltIn::DateTime,
            "time" => BuiltIn::Time,
            "duration" => BuiltIn::Duration,
            "base64Binary" => BuiltIn::Base64Binary,
            "hexBinary" => BuiltIn::HexBinary,
            "anyType" | "anySimpleType" => BuiltIn::AnyType,
            _ => return None,
        };

        Some(builtin)
    }

    /// Recognises names in the XML-Schema namespace, including references
    /// whose namespace URI was already stripped down to an empty string.
    pub fn from_qualified(name: &QualifiedName) -> Option<Self> {
        if name.in_namespace(XML_SCHEMA) || name.namespace.is_empty() {
            Self::from_local(&name.local)
        } else {
            None
        }
    }
}
