use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Lowest value a slider question can hold.
pub const SLIDER_MIN: u32 = 0;
/// Highest value a slider question can hold.
pub const SLIDER_MAX: u32 = 10;

/// Identifier of a catalog question.
///
/// Only question definitions mint identifiers, so any `QuestionId` in circulation
/// names a question that was declared in code. Raw keys arriving from storage or
/// HTTP are resolved through [`QuestionCatalog::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(&'static str);

impl QuestionId {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Slider,
    Choice,
}

/// Discrete answer offered by a choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: u32,
}

impl ChoiceOption {
    pub const fn new(label: &'static str, value: u32) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub text: &'static str,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    pub scored: bool,
}

impl QuestionDefinition {
    pub fn slider(id: &'static str, text: &'static str) -> Self {
        Self {
            id: QuestionId(id),
            text,
            kind: QuestionKind::Slider,
            options: Vec::new(),
            scored: true,
        }
    }

    pub fn choice(id: &'static str, text: &'static str, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: QuestionId(id),
            text,
            kind: QuestionKind::Choice,
            options,
            scored: true,
        }
    }

    /// Keep the question in the flow but leave it out of the total.
    pub fn unscored(mut self) -> Self {
        self.scored = false;
        self
    }

    /// Highest value this question can contribute.
    pub fn max_value(&self) -> u32 {
        match self.kind {
            QuestionKind::Slider => SLIDER_MAX,
            QuestionKind::Choice => self
                .options
                .iter()
                .map(|option| option.value)
                .max()
                .unwrap_or(0),
        }
    }

    pub fn accepts(&self, value: u32) -> bool {
        match self.kind {
            QuestionKind::Slider => (SLIDER_MIN..=SLIDER_MAX).contains(&value),
            QuestionKind::Choice => self.options.iter().any(|option| option.value == value),
        }
    }

    pub fn option_label(&self, value: u32) -> Option<&'static str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label)
    }
}

/// Ordered, validated list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionCatalog {
    questions: Vec<QuestionDefinition>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionDefinition>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(CatalogError::DuplicateId(question.id.to_string()));
            }

            match question.kind {
                QuestionKind::Choice if question.options.is_empty() => {
                    return Err(CatalogError::MissingOptions(question.id.to_string()));
                }
                QuestionKind::Slider if !question.options.is_empty() => {
                    return Err(CatalogError::UnexpectedOptions(question.id.to_string()));
                }
                _ => {}
            }

            let mut values = HashSet::new();
            for option in &question.options {
                if !values.insert(option.value) {
                    return Err(CatalogError::DuplicateOptionValue {
                        question: question.id.to_string(),
                        value: option.value,
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    /// The seven-question neck disability form.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionDefinition> {
        self.questions.get(index)
    }

    pub fn find(&self, raw_id: &str) -> Option<&QuestionDefinition> {
        self.questions
            .iter()
            .find(|question| question.id.as_str() == raw_id)
    }

    pub fn question(&self, id: QuestionId) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|question| question.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one question")]
    Empty,
    #[error("question id '{0}' is declared more than once")]
    DuplicateId(String),
    #[error("choice question '{0}' has no options")]
    MissingOptions(String),
    #[error("slider question '{0}' must not declare options")]
    UnexpectedOptions(String),
    #[error("question '{question}' repeats option value {value}")]
    DuplicateOptionValue { question: String, value: u32 },
}

fn standard_questions() -> Vec<QuestionDefinition> {
    vec![
        QuestionDefinition::slider(
            "werk_huishouden",
            "In hoeverre beperkt je nekpijn je bij je werk, studie of huishoudelijke taken?",
        ),
        QuestionDefinition::slider(
            "slapen",
            "In hoeverre verstoort je nekpijn je nachtrust?",
        ),
        QuestionDefinition::slider(
            "sport_recreatie",
            "In hoeverre belemmert je nekpijn je bij sport, hobby's of andere leuke activiteiten?",
        ),
        QuestionDefinition::slider(
            "autorijden",
            "In hoeverre ervaar je last van je nek tijdens het autorijden of fietsen?",
        ),
        QuestionDefinition::slider(
            "verzorging",
            "In hoeverre beïnvloedt de pijn simpele dingen als wassen en aankleden?",
        ),
        QuestionDefinition::slider(
            "concentratie",
            "In hoeverre heeft je nekpijn invloed op je concentratie, bijvoorbeeld bij lezen of op een scherm kijken?",
        ),
        QuestionDefinition::slider(
            "sociaal",
            "In hoeverre beperkt de pijn je in het afspreken met vrienden of familie?",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_passes_validation() {
        let catalog = QuestionCatalog::standard();
        let validated = QuestionCatalog::new(catalog.questions().to_vec())
            .expect("standard catalog is well formed");
        assert_eq!(validated.len(), 7);
        assert!(validated
            .questions()
            .iter()
            .all(|question| question.kind == QuestionKind::Slider && question.scored));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionCatalog::new(vec![
            QuestionDefinition::slider("slapen", "a"),
            QuestionDefinition::slider("slapen", "b"),
        ])
        .expect_err("duplicate ids rejected");
        assert_eq!(err, CatalogError::DuplicateId("slapen".to_string()));
    }

    #[test]
    fn choice_questions_require_options() {
        let err = QuestionCatalog::new(vec![QuestionDefinition::choice(
            "duur",
            "Hoe lang heeft u al klachten?",
            Vec::new(),
        )])
        .expect_err("empty options rejected");
        assert_eq!(err, CatalogError::MissingOptions("duur".to_string()));
    }

    #[test]
    fn sliders_must_not_carry_options() {
        let mut slider = QuestionDefinition::slider("slapen", "a");
        slider.options.push(ChoiceOption::new("Ja", 1));
        let err = QuestionCatalog::new(vec![slider]).expect_err("options rejected");
        assert!(matches!(err, CatalogError::UnexpectedOptions(_)));
    }

    #[test]
    fn option_labels_resolve_by_value() {
        let question = QuestionDefinition::choice(
            "duur",
            "Hoe lang heeft u al klachten?",
            vec![
                ChoiceOption::new("Korter dan 6 weken", 3),
                ChoiceOption::new("Langer dan 3 maanden", 10),
            ],
        );
        assert_eq!(question.option_label(10), Some("Langer dan 3 maanden"));
        assert_eq!(question.option_label(4), None);
        assert!(question.accepts(3));
        assert!(!question.accepts(0));
        assert_eq!(question.max_value(), 10);
    }
}
