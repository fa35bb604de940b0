use std::{fmt, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Type,
    Element,
    Message,
    PortType,
    Binding,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Document {0} has no root element")]
    EmptyDocument(String),

    #[error("Could not find namespace declaration for {0}")]
    MissingNamespace(String),

    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("Could not find {kind} {name}")]
    UnresolvedReference { kind: ReferenceKind, name: String },
}

impl Error {
    pub fn unresolved(kind: ReferenceKind, name: impl fmt::Display) -> Self {
        Self::UnresolvedReference {
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ReferenceKind::Type => "type",
            ReferenceKind::Element => "element",
            ReferenceKind::Message => "message",
            ReferenceKind::PortType => "port type",
            ReferenceKind::Binding => "binding",
        };

        f.write_str(kind)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
