use proc_macro2::TokenStream;
use std::io::Write;
use whistler_wsdl::{self as wsdl, types::Definition};

mod codegen;

pub mod error;
pub mod naming;
pub mod synthesizer;
pub mod types;

pub use codegen::Codegen;
pub use error::{Error, Result};
pub use synthesizer::{synthesize_definition, Synthesizer};
pub use types::Output;

pub fn from_url<S: AsRef<str>>(url: S) -> Result<TokenStream> {
    let definition = wsdl::parse(url)?;
    from_definition(&definition)
}

pub fn from_definition(definition: &Definition) -> Result<TokenStream> {
    let output = synthesize_definition(definition)?;
    Ok(output.codegen(&output))
}

/// Pretty-printed Rust source for `output`.
pub fn render(output: &Output) -> Result<String> {
    let file: syn::File = syn::parse2(output.codegen(output))?;
    Ok(prettyplease::unparse(&file))
}

pub fn write_to<W: Write>(output: &Output, mut writer: W) -> Result<()> {
    let source = render(output)?;
    writer.write_all(source.as_bytes())?;
    Ok(())
}
