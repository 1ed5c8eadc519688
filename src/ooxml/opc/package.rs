//! In-memory OPC package assembled before serialization.

use std::collections::HashMap;

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::Relationships;

/// An OPC package: package-level relationships plus the parts, kept in the
/// order they were added.
#[derive(Debug, Default)]
pub struct OpcPackage {
    rels: Relationships,
    parts: Vec<Part>,
    index: HashMap<PackURI, usize>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part. Partnames must be unique.
    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if self.index.contains_key(part.partname()) {
            return Err(OpcError::DuplicatePart(part.partname().to_string()));
        }
        self.index.insert(part.partname().clone(), self.parts.len());
        self.parts.push(part);
        Ok(())
    }

    pub fn get_part(&self, partname: &PackURI) -> Option<&Part> {
        self.index.get(partname).map(|&idx| &self.parts[idx])
    }

    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.index.contains_key(partname)
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package itself to a part, returning the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels.relate_to(target, reltype)
    }

    /// First free partname for a numbered template such as
    /// `/ppt/media/image%d.png`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=self.parts.len() as u32 + 1)
            .map(|n| template.replace("%d", &n.to_string()))
            .find_map(|candidate| {
                let uri = PackURI::new(candidate).ok()?;
                (!self.contains_part(&uri)).then_some(uri)
            })
            .ok_or_else(|| OpcError::InvalidPackUri(template.to_string()))
    }
}
