/// Package URIs: the names of parts inside an OPC package.
///
/// A PackURI always begins with a forward slash and uses forward slashes as
/// path separators, e.g. `/ppt/slides/slide1.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

/// The package pseudo-partname.
pub const PACKAGE_URI: &str = "/";

/// Partname of the content types item.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

impl PackURI {
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// ZIP member name: the URI with its leading slash stripped.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Reference to this part relative to `base_uri`.
    ///
    /// `/ppt/slideLayouts/slideLayout1.xml` seen from `/ppt/slides` is
    /// `../slideLayouts/slideLayout1.xml`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = vec![".."; from_parts.len() - common];
        segments.extend_from_slice(&to_parts[common..]);
        segments.join("/")
    }

    /// PackURI of the `.rels` item holding this part's relationships.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let rels_filename = format!("{}.rels", self.filename());
        let base_uri = self.base_uri();
        if base_uri == "/" {
            Self::new(format!("/_rels/{}", rels_filename))
        } else {
            Self::new(format!("{}/_rels/{}", base_uri, rels_filename))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}
