use thiserror::Error;
use whistler_wsdl::error::Error as WsdlError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Wsdl(#[from] WsdlError),

    #[error("Type {0} restricts itself")]
    CyclicAlias(String),

    #[error("Unable to format generated code")]
    FormatError(#[from] syn::Error),

    #[error("Unable to write generated code")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
