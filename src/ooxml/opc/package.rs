/// In-memory OPC package.
///
/// [`OpcPackage`] owns every part reachable from the package relationships
/// and supports the handful of structural edits a deck renderer needs:
/// adding parts, dropping parts, and allocating fresh partnames.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io::{Read, Seek};
use std::path::Path;

pub struct OpcPackage {
    rels: Relationships,
    parts: HashMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: HashMap::new(),
        }
    }

    /// Open an OPC package from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let phys_reader = PhysPkgReader::open(path)?;
        Self::unmarshal(PackageReader::from_phys_reader(phys_reader)?)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let phys_reader = PhysPkgReader::new(reader)?;
        Self::unmarshal(PackageReader::from_phys_reader(phys_reader)?)
    }

    /// Turn serialized parts and relationships into the in-memory graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname.clone(), spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut()
                    .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
            }
            package.parts.insert(spart.partname, part);
        }

        Ok(package)
    }

    /// Partname of the main document part (`/ppt/presentation.xml` for decks).
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    /// The main document part.
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        let partname = self.main_document_partname()?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        self.parts
            .get_mut(partname)
            .map(|b| &mut **b as &mut dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// First free partname for a `%d` template such as `/ppt/slides/slide%d.xml`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=self.parts.len() as u32 + 1)
            .map(|n| template.replace("%d", &n.to_string()))
            .find_map(|candidate| {
                let uri = PackURI::new(candidate).ok()?;
                (!self.parts.contains_key(&uri)).then_some(uri)
            })
            .ok_or_else(|| OpcError::InvalidPackUri(format!("no free partname for {}", template)))
    }

    /// Partnames reachable from the package relationships, in sorted order.
    pub fn reachable_partnames(&self) -> BTreeSet<PackURI> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<PackURI> = VecDeque::new();

        let mut visit = |rels: &Relationships, queue: &mut VecDeque<PackURI>| {
            for rel in rels.iter().filter(|rel| !rel.is_external()) {
                if let Ok(target) = rel.target_partname() {
                    if self.parts.contains_key(&target) && seen.insert(target.clone()) {
                        queue.push_back(target);
                    }
                }
            }
        };

        visit(&self.rels, &mut queue);
        while let Some(partname) = queue.pop_front() {
            if let Some(part) = self.parts.get(&partname) {
                visit(part.rels(), &mut queue);
            }
        }

        seen
    }

    /// Drop every part no relationship chain from the package reaches.
    ///
    /// Returns the number of parts removed.
    pub fn prune_unreachable(&mut self) -> usize {
        let reachable = self.reachable_partnames();
        let before = self.parts.len();
        self.parts.retain(|partname, _| reachable.contains(partname));
        before - self.parts.len()
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
