//! Parts of an OPC package.

use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

/// A part in an OPC package: partname, content type, content and outgoing
/// relationships.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    /// Create a part whose relationships were built before its content.
    ///
    /// XML parts reference their rIds, so callers typically allocate
    /// relationships first and render the XML afterwards.
    pub fn with_rels(
        partname: PackURI,
        content_type: impl Into<String>,
        blob: Vec<u8>,
        rels: Relationships,
    ) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or get a relationship to another part, returning the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels.relate_to(target, reltype)
    }
}
