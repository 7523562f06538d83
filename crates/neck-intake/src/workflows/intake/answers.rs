use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::catalog::{
    QuestionCatalog, QuestionDefinition, QuestionId, QuestionKind, SLIDER_MAX, SLIDER_MIN,
};

/// Answers keyed by catalog question. Keys are never removed once present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<QuestionId, u32>,
}

impl AnswerSet {
    /// Every catalog question mapped to 0.
    pub fn initialized(catalog: &QuestionCatalog) -> Self {
        let values = catalog
            .questions()
            .iter()
            .map(|question| (question.id, 0))
            .collect();
        Self { values }
    }

    /// Rebuild an answer set from stored raw keys.
    ///
    /// Keys the catalog does not know and values outside a question's domain are
    /// dropped in favour of the initial value.
    pub fn from_stored(raw: BTreeMap<String, u32>, catalog: &QuestionCatalog) -> Self {
        let mut answers = Self::initialized(catalog);
        for (key, value) in raw {
            match catalog.find(&key) {
                Some(question) if question.accepts(value) => {
                    answers.values.insert(question.id, value);
                }
                Some(_) => {
                    warn!(question = %key, value, "discarding stored answer outside question domain");
                }
                None => {
                    warn!(question = %key, "discarding stored answer for unknown question");
                }
            }
        }
        answers
    }

    pub fn get(&self, id: QuestionId) -> Option<u32> {
        self.values.get(&id).copied()
    }

    pub fn value_or_zero(&self, id: QuestionId) -> u32 {
        self.get(id).unwrap_or(0)
    }

    pub fn record(&mut self, question: &QuestionDefinition, value: u32) -> Result<(), AnswerError> {
        if !question.accepts(value) {
            return Err(match question.kind {
                QuestionKind::Slider => AnswerError::OutOfRange {
                    question: question.id.to_string(),
                    value,
                    min: SLIDER_MIN,
                    max: SLIDER_MAX,
                },
                QuestionKind::Choice => AnswerError::NotAnOption {
                    question: question.id.to_string(),
                    value,
                },
            });
        }

        self.values.insert(question.id, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, u32)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn set_unchecked(&mut self, id: QuestionId, value: u32) {
        self.values.insert(id, value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("answer {value} for '{question}' must lie between {min} and {max}")]
    OutOfRange {
        question: String,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("answer {value} is not an option of '{question}'")]
    NotAnOption { question: String, value: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::catalog::ChoiceOption;

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            QuestionDefinition::slider("slapen", "Nachtrust"),
            QuestionDefinition::choice(
                "duur",
                "Duur",
                vec![ChoiceOption::new("Kort", 3), ChoiceOption::new("Lang", 10)],
            ),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn initialized_maps_every_question_to_zero() {
        let catalog = catalog();
        let answers = AnswerSet::initialized(&catalog);
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|(_, value)| value == 0));
    }

    #[test]
    fn record_rejects_values_outside_the_domain() {
        let catalog = catalog();
        let mut answers = AnswerSet::initialized(&catalog);
        let slider = catalog.find("slapen").expect("slider present");
        let choice = catalog.find("duur").expect("choice present");

        assert!(matches!(
            answers.record(slider, 11),
            Err(AnswerError::OutOfRange { max: 10, .. })
        ));
        assert!(matches!(
            answers.record(choice, 4),
            Err(AnswerError::NotAnOption { value: 4, .. })
        ));

        answers.record(choice, 10).expect("option value accepted");
        assert_eq!(answers.get(choice.id), Some(10));
    }

    #[test]
    fn from_stored_masks_unknown_and_invalid_entries() {
        let catalog = catalog();
        let mut raw = BTreeMap::new();
        raw.insert("slapen".to_string(), 42);
        raw.insert("duur".to_string(), 3);
        raw.insert("legacy_vraag".to_string(), 7);

        let answers = AnswerSet::from_stored(raw, &catalog);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(catalog.questions()[0].id), Some(0));
        assert_eq!(answers.get(catalog.questions()[1].id), Some(3));
    }
}
