//! Office Open XML (OOXML) writing.
//!
//! Two layers:
//!
//! 1. **OPC layer** (`opc`): parts, relationships, content types and the ZIP
//!    container.
//! 2. **PresentationML** (`pptx`): the mutable slide object model that is
//!    serialized into parts.
pub mod error;
pub mod opc;
pub mod pptx;

pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
