use std::path::Path;
use url::Url;

mod parser;

pub mod builtin;
pub mod document;
pub mod error;
pub mod namespaces;
pub mod schema;
pub mod source;
pub mod table;
pub mod types;

pub use parser::parse as parse_with;

/// Parses the WSDL at `url` (a URL or a local path) with a default [`source::Loader`].
pub fn parse<S: AsRef<str>>(url: S) -> Result<types::Definition, error::Error> {
    let identifier = identifier(url.as_ref())?;
    let mut loader = source::Loader::new();

    parser::parse(&mut loader, &identifier, schema::WalkOptions::default())
}

/// Canonical identifier for a user supplied location: URLs are kept, local
/// paths become absolute `file` URLs so relative schema locations resolve.
pub fn identifier(location: &str) -> Result<String, error::Error> {
    match Url::parse(location) {
        Ok(url) => Ok(url.to_string()),

        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = Path::new(location)
                .canonicalize()
                .map_err(|err| error::Error::PathConversionError(Some(err)))?;

            Url::from_file_path(&path)
                .map(|url| url.to_string())
                .map_err(|()| error::Error::PathConversionError(None))
        }

        Err(err) => Err(err.into()),
    }
}
