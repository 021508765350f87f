/// Part names inside an OPC package.
///
/// A `PackURI` is the absolute, slash-rooted name of a package member such as
/// `/ppt/slides/slide3.xml`. Relationship targets are stored relative to the
/// directory of their source part, so most of this type is about converting
/// between the two forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string that must begin with `/`.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relationship target such as `../slideLayouts/slideLayout2.xml`
    /// against the directory of its source part.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        // Some producers write absolute targets
        if relative_ref.starts_with('/') {
            return Self::new(normalize(relative_ref));
        }
        let joined = if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(normalize(&joined))
    }

    /// Directory portion, `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Last path segment, `slide1.xml` for `/ppt/slides/slide1.xml`.
    pub fn filename(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or_default()
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        self.filename()
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default()
    }

    /// Numeric suffix of a tuple partname, `21` for `/ppt/slides/slide21.xml`.
    pub fn idx(&self) -> Option<u32> {
        let stem = match self.filename().rsplit_once('.') {
            Some((stem, _)) => stem,
            None => self.filename(),
        };
        let name = stem.trim_end_matches(|c: char| c.is_ascii_digit());
        if name.is_empty() || name.len() == stem.len() {
            return None;
        }
        atoi_simd::parse::<u32, false, false>(stem[name.len()..].as_bytes()).ok()
    }

    /// ZIP member name, the URI without its leading slash.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this part, as written in `.rels` files.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();
        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = vec![".."; from.len() - common];
        segments.extend_from_slice(&to[common..]);
        segments.join("/")
    }

    /// The `.rels` part holding relationships whose source is this part.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        match self.base_uri() {
            "/" => Self::new(format!("/_rels/{}.rels", self.filename())),
            base => Self::new(format!("{}/_rels/{}.rels", base, self.filename())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            _ => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";
