pub mod ai_helper;
pub mod answer;
pub mod catalog;
pub mod round;
pub mod speech;
pub mod stats;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Category {
    #[default]
    Regular,
    Irregular,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Regular, Category::Irregular];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Regular => "Regular ar/er/ir",
            Category::Irregular => "Irregular",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Tense {
    #[default]
    Present,
    Preterite,
}

impl Tense {
    pub const ALL: [Tense; 2] = [Tense::Present, Tense::Preterite];

    pub fn label(&self) -> &'static str {
        match self {
            Tense::Present => "Present",
            Tense::Preterite => "Preterite",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label.trim())
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grammatical persons drilled by the quiz, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    #[serde(rename = "Yo")]
    Yo,
    #[serde(rename = "Tú")]
    Tu,
    #[serde(rename = "Él/Ella/Usted")]
    ElEllaUsted,
    #[serde(rename = "Nosotros")]
    Nosotros,
    #[serde(rename = "Ellos/Ellas/Ustedes")]
    EllosEllasUstedes,
}

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::Yo,
        Subject::Tu,
        Subject::ElEllaUsted,
        Subject::Nosotros,
        Subject::EllosEllasUstedes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Yo => "Yo",
            Subject::Tu => "Tú",
            Subject::ElEllaUsted => "Él/Ella/Usted",
            Subject::Nosotros => "Nosotros",
            Subject::EllosEllasUstedes => "Ellos/Ellas/Ustedes",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One tense worth of forms. Every subject has a field, so a catalog entry
/// with a missing cell does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Conjugation {
    #[serde(rename = "Yo")]
    pub yo: String,
    #[serde(rename = "Tú")]
    pub tu: String,
    #[serde(rename = "Él/Ella/Usted")]
    pub el_ella_usted: String,
    #[serde(rename = "Nosotros")]
    pub nosotros: String,
    #[serde(rename = "Ellos/Ellas/Ustedes")]
    pub ellos_ellas_ustedes: String,
}

impl Conjugation {
    pub fn form(&self, subject: Subject) -> &str {
        match subject {
            Subject::Yo => &self.yo,
            Subject::Tu => &self.tu,
            Subject::ElEllaUsted => &self.el_ella_usted,
            Subject::Nosotros => &self.nosotros,
            Subject::EllosEllasUstedes => &self.ellos_ellas_ustedes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TenseTable {
    #[serde(rename = "Present")]
    pub present: Conjugation,
    #[serde(rename = "Preterite")]
    pub preterite: Conjugation,
}

impl TenseTable {
    pub fn tense(&self, tense: Tense) -> &Conjugation {
        match tense {
            Tense::Present => &self.present,
            Tense::Preterite => &self.preterite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerbEntry {
    pub infinitive: String,
    pub meaning: String,
    pub category: Category,
    pub conjugations: TenseTable,
}

impl VerbEntry {
    pub fn conjugation(&self, tense: Tense, subject: Subject) -> &str {
        self.conjugations.tense(tense).form(subject)
    }
}

/// Outcome of checking one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    pub is_accent_error: bool,
    pub correct_answer: String,
    pub user_answer: String,
}

/// The pair currently on screen, plus the verb that was shown before it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundState {
    pub verb: VerbEntry,
    pub subject: Subject,
    pub last_verb_infinitive: Option<String>,
}

impl RoundState {
    pub fn new(verb: VerbEntry, subject: Subject, last_verb_infinitive: Option<String>) -> Self {
        Self {
            verb,
            subject,
            last_verb_infinitive,
        }
    }

    pub fn correct_answer(&self, tense: Tense) -> &str {
        self.verb.conjugation(tense, self.subject)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::verb;
    use super::*;

    #[test]
    fn labels_round_trip() {
        for tense in Tense::ALL {
            assert_eq!(Tense::from_label(tense.label()), Some(tense));
        }
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Tense::from_label("Future"), None);
    }

    #[test]
    fn conjugation_lookup_covers_every_cell() {
        let hablar = verb("hablar", Category::Regular);
        assert_eq!(hablar.conjugation(Tense::Present, Subject::Yo), "hablo");
        assert_eq!(hablar.conjugation(Tense::Preterite, Subject::Yo), "hablé");
        assert_eq!(
            hablar.conjugation(Tense::Preterite, Subject::EllosEllasUstedes),
            "hablaron"
        );
        for tense in Tense::ALL {
            for subject in Subject::ALL {
                assert!(!hablar.conjugation(tense, subject).is_empty());
            }
        }
    }

    #[test]
    fn subject_serializes_with_display_label() {
        let json = serde_json::to_string(&Subject::ElEllaUsted).unwrap();
        assert_eq!(json, "\"Él/Ella/Usted\"");
    }
}
