//! Certificate of completion

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub brand: String,
    pub learner_name: String,
    /// Printed verbatim
    pub course_title: String,
    pub instructor_name: String,
    pub issued_on: NaiveDate,
}

impl Certificate {
    /// `certificate-<slug>.pdf`, slug from the course title
    pub fn file_name(&self) -> String {
        let mut slug = String::with_capacity(self.course_title.len());
        for ch in self.course_title.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            "certificate.pdf".to_string()
        } else {
            format!("certificate-{slug}.pdf")
        }
    }

    pub fn issued_on_text(&self) -> String {
        self.issued_on.format("%B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate(title: &str) -> Certificate {
        Certificate {
            brand: "LMS Academy".into(),
            learner_name: "Ada".into(),
            course_title: title.into(),
            instructor_name: "Grace".into(),
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
        }
    }

    #[test]
    fn test_file_name_slug() {
        assert_eq!(
            certificate("Rust: Zero to Hero!").file_name(),
            "certificate-rust-zero-to-hero.pdf"
        );
        assert_eq!(certificate("日本語").file_name(), "certificate.pdf");
    }

    #[test]
    fn test_issued_on_text() {
        assert_eq!(certificate("x").issued_on_text(), "March 7, 2026");
    }
}
