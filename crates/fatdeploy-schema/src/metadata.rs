use crate::coordinate::{strip_directives, Coordinate};
use crate::IdentityError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;

/// Archive entry holding the bundle's main metadata segment.
pub const METADATA_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Metadata key carrying the bundle's symbolic name (plus optional directives).
pub const SYMBOLIC_NAME_KEY: &str = "Bundle-SymbolicName";

/// Metadata key carrying the bundle's version.
pub const VERSION_KEY: &str = "Bundle-Version";

/// Parsed key/value metadata from a bundle's main section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleMetadata {
    attributes: BTreeMap<String, String>,
}

impl BundleMetadata {
    /// Parse the jar-style metadata format: `Key: Value` lines, where a line
    /// starting with a single space continues the previous value. Parsing
    /// stops at the first blank line (the end of the main section); lines
    /// without a separator are ignored.
    pub fn parse(input: &str) -> Self {
        let mut attributes = BTreeMap::new();
        let mut current: Option<(String, String)> = None;

        for line in input.lines() {
            if line.is_empty() {
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(continuation);
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                if let Some((k, v)) = current.take() {
                    attributes.insert(k, v);
                }
                current = Some((key.trim().to_owned(), value.trim_start().to_owned()));
            }
        }
        if let Some((k, v)) = current.take() {
            attributes.insert(k, v);
        }

        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Open a candidate file as a bundle archive and read its metadata segment.
pub fn read_bundle_metadata(path: &Path) -> Result<BundleMetadata, IdentityError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| IdentityError::Unreadable {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut entry = match archive.by_name(METADATA_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(IdentityError::NoMetadata(path.to_path_buf()));
        }
        Err(e) => {
            return Err(IdentityError::Unreadable {
                file: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(BundleMetadata::parse(&text))
}

/// Resolve the publish coordinate for one candidate file.
///
/// The artifact identifier is the bundle's symbolic name with any directives
/// stripped; the version is taken verbatim; the group is the configured
/// default. Any missing or empty required value fails resolution for this
/// file only.
pub fn resolve_coordinate(path: &Path, default_group: &str) -> Result<Coordinate, IdentityError> {
    let metadata = read_bundle_metadata(path)?;
    let symbolic_name = metadata
        .get(SYMBOLIC_NAME_KEY)
        .ok_or(IdentityError::MissingKey(SYMBOLIC_NAME_KEY))?;
    let version = metadata
        .get(VERSION_KEY)
        .ok_or(IdentityError::MissingKey(VERSION_KEY))?;

    Coordinate::new(default_group, strip_directives(symbolic_name), version)
}
