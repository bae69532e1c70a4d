use crate::parser::ExtractedDetails;

pub const DEADLINE_LABEL: &str = "Bewerbungsfrist";
pub const ADMISSION_LABEL: &str = "Zulassungsbeschränkung";

/// Merge extracted facts and free text into the canonical article text.
///
/// Facts come first in page order, then the body, then the application
/// deadline and the admission restriction as the two closing sections.
/// Pure function: identical input yields byte-identical output.
pub fn format_article(details: &ExtractedDetails) -> String {
    let mut out = String::new();

    for (label, value) in &details.facts {
        if label == DEADLINE_LABEL || label == ADMISSION_LABEL {
            continue;
        }
        push_section(&mut out, label, value);
    }

    if !details.body.is_empty() {
        out.push_str(&details.body);
        out.push_str("\n\n");
    }

    if let Some(value) = details.fact(DEADLINE_LABEL) {
        push_section(&mut out, DEADLINE_LABEL, value);
    }
    if let Some(value) = details.fact(ADMISSION_LABEL) {
        push_section(&mut out, ADMISSION_LABEL, value);
    }

    out.trim().to_string()
}

fn push_section(out: &mut String, label: &str, value: &str) {
    out.push_str("## ");
    out.push_str(label);
    out.push('\n');
    out.push_str(value);
    out.push_str("\n\n");
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> ExtractedDetails {
        ExtractedDetails {
            headline: "Bachelor Informatik".into(),
            url: "https://example.de/studium/bachelor-informatik".into(),
            facts: vec![
                ("Abschluss".into(), "Bachelor of Science".into()),
                ("Bewerbungsfrist".into(), "15. Juli".into()),
                ("Regelstudienzeit".into(), "6 Semester".into()),
                ("Zulassungsbeschränkung".into(), "Nein".into()),
            ],
            body: "Die Informatik beschäftigt sich mit Software.".into(),
        }
    }

    #[test]
    fn reserved_sections_come_last_in_fixed_order() {
        let text = format_article(&details());
        let frist = text.find("## Bewerbungsfrist").unwrap();
        let nc = text.find("## Zulassungsbeschränkung").unwrap();
        let body = text.find("Die Informatik").unwrap();
        assert!(body < frist);
        assert!(frist < nc);
        // Reserved facts are not duplicated in the leading section list
        assert_eq!(text.matches("## Bewerbungsfrist").count(), 1);
    }

    #[test]
    fn facts_in_extraction_order() {
        let text = format_article(&details());
        let abschluss = text.find("## Abschluss").unwrap();
        let rsz = text.find("## Regelstudienzeit").unwrap();
        assert!(abschluss < rsz);
    }

    #[test]
    fn deterministic() {
        let d = details();
        assert_eq!(format_article(&d), format_article(&d));
    }

    #[test]
    fn trimmed_output() {
        let text = format_article(&details());
        assert_eq!(text, text.trim());
        assert!(text.ends_with("Nein"));
    }

    #[test]
    fn body_only_details() {
        let d = ExtractedDetails {
            headline: "Bachelor Informatik".into(),
            url: "#bachelor-informatik".into(),
            facts: vec![],
            body: "Platzhaltertext.".into(),
        };
        assert_eq!(format_article(&d), "Platzhaltertext.");
    }

    #[test]
    fn missing_reserved_facts_are_omitted() {
        let d = ExtractedDetails {
            facts: vec![("Abschluss".into(), "Diplom".into())],
            body: String::new(),
            ..Default::default()
        };
        assert_eq!(format_article(&d), "## Abschluss\nDiplom");
    }
}
