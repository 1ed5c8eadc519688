//! Open Packaging Conventions: parts, relationships and the ZIP container
//! an OOXML document is stored in.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
