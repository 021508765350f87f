/// Open Packaging Conventions (OPC) implementation.
///
/// The container layer underneath PresentationML: ZIP members, content
/// types, partnames and the relationship graph between parts.
///
/// - Uses `quick-xml` for streaming parsing of `[Content_Types].xml` and `.rels` members
/// - Uses `atoi_simd` for rId and partname index parsing
/// - Uses `memchr` for relationship reference counting in part content
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
