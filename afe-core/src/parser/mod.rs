//! AFE file parser module.

mod afe;
mod container;
mod markup;

pub use afe::{parse_afe_bytes, parse_afe_bytes_with, parse_afe_file, ModelBuilder};
pub use container::{classify, Container, ContainerKind};
pub use markup::{MarkupDecoder, XmlDecoder, XmlNode};
