//! Relationships between parts of an OPC package.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::packuri::PackURI;

/// A single internal relationship from a source part to a target part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    /// Target reference relative to the source's base URI
    target_ref: String,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// Relationships of a single source (a part, or the package itself).
///
/// Kept in insertion order so that rIds are allocated and serialized
/// deterministically.
#[derive(Debug, Clone)]
pub struct Relationships {
    base_uri: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty collection for a source living in `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: Vec::new(),
        }
    }

    /// Relate to `target`, reusing an existing relationship of the same type
    /// to the same part. Returns the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(&self.base_uri);
        self.get_or_add(reltype, &target_ref).r_id().to_string()
    }

    /// Get or add a relationship to a target reference.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> &Relationship {
        let existing = self
            .rels
            .iter()
            .position(|rel| rel.reltype() == reltype && rel.target_ref() == target_ref);
        let idx = match existing {
            Some(idx) => idx,
            None => {
                let r_id = self.next_r_id();
                self.rels.push(Relationship::new(
                    r_id,
                    reltype.to_string(),
                    target_ref.to_string(),
                ));
                self.rels.len() - 1
            },
        };
        &self.rels[idx]
    }

    /// Next free relationship ID, filling gaps first.
    fn next_r_id(&self) -> String {
        let mut used_numbers: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| {
                let r_id = rel.r_id();
                if r_id.len() > 3 && r_id.starts_with("rId") {
                    atoi_simd::parse::<u32, false, false>(&r_id.as_bytes()[3..]).ok()
                } else {
                    None
                }
            })
            .collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id() == r_id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to the content of a `.rels` item.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespace::RELATIONSHIPS));

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/")
    }
}
