//! Atomic catalog loading and lookup.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use sahayak_core::error::SahayakError;

use crate::program::{ProgramCategory, ProgramDefinition};

/// Errors raised while loading the program catalog.
///
/// Any of these fails the whole load; a catalog is never partially loaded.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate program id: {0}")]
    DuplicateId(String),
    #[error("program at index {0} has an empty id")]
    EmptyId(usize),
    #[error("program {0} is missing an English name")]
    MissingEnglishName(String),
    #[error("program {id} has an inverted age range ({min}..={max})")]
    InvalidAgeRange { id: String, min: u8, max: u8 },
}

impl From<CatalogError> for SahayakError {
    fn from(err: CatalogError) -> Self {
        SahayakError::Catalog(err.to_string())
    }
}

/// Immutable table of assistance programs.
///
/// Declaration order of the source file is preserved and is the stable
/// tie-break used by the eligibility scorer. `Catalog` is `Send + Sync` and
/// is shared via `Arc` across all concurrent sessions.
#[derive(Debug)]
pub struct Catalog {
    programs: Vec<ProgramDefinition>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON text. All-or-nothing: the first
    /// malformed entry fails the load.
    pub fn load_from_str(json: &str) -> Result<Self, CatalogError> {
        let programs: Vec<ProgramDefinition> = serde_json::from_str(json)?;

        let mut by_id = HashMap::with_capacity(programs.len());
        for (index, program) in programs.iter().enumerate() {
            if program.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            if !program.name.has_english() {
                return Err(CatalogError::MissingEnglishName(program.id.clone()));
            }
            if let (Some(min), Some(max)) =
                (program.eligibility.age_min, program.eligibility.age_max)
            {
                if min > max {
                    return Err(CatalogError::InvalidAgeRange {
                        id: program.id.clone(),
                        min,
                        max,
                    });
                }
            }
            if by_id.insert(program.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(program.id.clone()));
            }
        }

        info!("Catalog loaded with {} programs", programs.len());
        Ok(Self { programs, by_id })
    }

    /// Load a catalog from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// Look up a program by id.
    pub fn lookup(&self, id: &str) -> Option<&ProgramDefinition> {
        self.by_id.get(id).map(|&index| &self.programs[index])
    }

    /// All programs in declaration order.
    pub fn all(&self) -> &[ProgramDefinition] {
        &self.programs
    }

    /// Programs belonging to a category, in declaration order.
    pub fn by_category(&self, category: ProgramCategory) -> Vec<&ProgramDefinition> {
        self.programs
            .iter()
            .filter(|p| p.categories.contains(&category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
