use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;

use thiserror::Error;

use crate::quiz::{Category, Subject, Tense, VerbEntry};

const BUNDLED_VERBS: &str = include_str!("../../data/verbs.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read verb catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed verb catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("verb catalog has an entry without an infinitive")]
    BlankInfinitive,
    #[error("verb \"{0}\" is listed more than once")]
    DuplicateInfinitive(String),
    #[error("verb \"{infinitive}\" has no {tense} form for {subject}")]
    BlankForm {
        infinitive: String,
        tense: Tense,
        subject: Subject,
    },
    #[error("no verbs in category \"{0}\"")]
    EmptyCategory(Category),
}

/// The read-only list of verbs the quiz draws from.
///
/// Construction checks that the data is usable, so nothing downstream has
/// to: every category has at least one verb, infinitives are unique and no
/// form is blank.
#[derive(Debug, Clone)]
pub struct VerbCatalog {
    verbs: Vec<VerbEntry>,
}

impl VerbCatalog {
    pub fn new(file: File) -> Result<Self, CatalogError> {
        let verbs: Vec<VerbEntry> = serde_json::from_reader(BufReader::new(file))?;
        Self::from_verbs(verbs)
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_VERBS)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let verbs: Vec<VerbEntry> = serde_json::from_str(json)?;
        Self::from_verbs(verbs)
    }

    pub fn from_verbs(verbs: Vec<VerbEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for verb in &verbs {
            if verb.infinitive.trim().is_empty() {
                return Err(CatalogError::BlankInfinitive);
            }
            if !seen.insert(verb.infinitive.as_str()) {
                return Err(CatalogError::DuplicateInfinitive(verb.infinitive.clone()));
            }
            for tense in Tense::ALL {
                for subject in Subject::ALL {
                    if verb.conjugation(tense, subject).trim().is_empty() {
                        return Err(CatalogError::BlankForm {
                            infinitive: verb.infinitive.clone(),
                            tense,
                            subject,
                        });
                    }
                }
            }
        }

        if let Some(empty) = Category::ALL
            .into_iter()
            .find(|c| !verbs.iter().any(|v| v.category == *c))
        {
            return Err(CatalogError::EmptyCategory(empty));
        }

        Ok(Self { verbs })
    }

    pub fn verbs(&self) -> &[VerbEntry] {
        &self.verbs
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.verbs.iter().filter(|v| v.category == category).count()
    }
}
