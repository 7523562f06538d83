use super::answers::AnswerSet;
use super::catalog::{QuestionCatalog, QuestionKind};
use super::classification::ClassificationTier;
use super::contact::ContactInfo;

/// Placeholder for a choice answer whose value matches no option.
pub const UNRESOLVED_ANSWER: &str = "N/A";

/// Plain-text lead report for staff, in catalog order.
pub fn format_report(
    contact: &ContactInfo,
    score: u32,
    max_score: u32,
    tier: &ClassificationTier,
    answers: &AnswerSet,
    catalog: &QuestionCatalog,
) -> String {
    let mut lines = vec![
        format!("Naam: {}", contact.name),
        format!("E-mail: {}", contact.email),
        format!("Telefoon: {}", contact.phone.as_deref().unwrap_or("-")),
        String::new(),
        format!("Score: {score}/{max_score}"),
        format!("Classificatie: {}", tier.level.label().to_uppercase()),
        format!("Toelichting: {}", tier.description),
        format!("Advies: {}", tier.urgency),
        String::new(),
        "Antwoorden:".to_string(),
    ];

    for question in catalog.questions() {
        let value = answers.value_or_zero(question.id);
        let rendered = match question.kind {
            QuestionKind::Slider => value.to_string(),
            QuestionKind::Choice => question
                .option_label(value)
                .unwrap_or(UNRESOLVED_ANSWER)
                .to_string(),
        };
        lines.push(format!("- {}: {}", question.text, rendered));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::catalog::{ChoiceOption, QuestionDefinition};
    use crate::workflows::intake::classification::TierTable;

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Pieter Bakker".to_string(),
            email: "pieter@example.nl".to_string(),
            phone: None,
            consent: true,
        }
    }

    #[test]
    fn report_lists_contact_score_and_answers_in_catalog_order() {
        let catalog = QuestionCatalog::new(vec![
            QuestionDefinition::slider("slapen", "Nachtrust"),
            QuestionDefinition::choice(
                "duur",
                "Hoe lang al?",
                vec![
                    ChoiceOption::new("Korter dan 6 weken", 3),
                    ChoiceOption::new("Langer dan 3 maanden", 10),
                ],
            ),
        ])
        .expect("valid catalog");
        let mut answers = AnswerSet::initialized(&catalog);
        answers
            .record(&catalog.questions()[0], 6)
            .expect("slider value");
        answers
            .record(&catalog.questions()[1], 10)
            .expect("choice value");

        let tiers = TierTable::standard();
        let report = format_report(&contact(), 16, 20, tiers.classify(16), &answers, &catalog);

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Naam: Pieter Bakker");
        assert_eq!(lines[2], "Telefoon: -");
        assert!(report.contains("Score: 16/20"));
        assert!(report.contains("Classificatie: LICHT"));
        let slider_line = lines
            .iter()
            .position(|line| *line == "- Nachtrust: 6")
            .expect("slider rendered");
        let choice_line = lines
            .iter()
            .position(|line| *line == "- Hoe lang al?: Langer dan 3 maanden")
            .expect("choice label rendered");
        assert!(slider_line < choice_line);
    }

    #[test]
    fn unresolvable_choice_value_renders_placeholder() {
        let catalog = QuestionCatalog::new(vec![QuestionDefinition::choice(
            "duur",
            "Hoe lang al?",
            vec![ChoiceOption::new("Kort", 3)],
        )])
        .expect("valid catalog");
        let answers = AnswerSet::initialized(&catalog);
        let tiers = TierTable::standard();

        let report = format_report(&contact(), 0, 3, tiers.classify(0), &answers, &catalog);
        assert!(report.ends_with("- Hoe lang al?: N/A"));
    }
}
