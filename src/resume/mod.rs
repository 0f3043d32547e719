//! Resume intake: text from a PDF (raw or base64) and the contact,
//! education, experience and skills fields a prompt can use.

mod extract;
mod fields;

pub use extract::{decode_base64, looks_like_pdf, pdf_text};

use std::fmt::Write;

use crate::error::Error;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Education {
    pub institution: String,
    pub degree: Option<String>,
    pub duration: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub company: String,
    pub position: Option<String>,
    pub duration: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub contact: ContactInfo,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub raw_text: String,
}

impl ParsedResume {
    pub fn from_pdf(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_text(&pdf_text(bytes)?)
    }

    pub fn from_base64(data: &str) -> Result<Self, Error> {
        Self::from_pdf(&decode_base64(data)?)
    }

    pub fn from_text(text: &str) -> Result<Self, Error> {
        let p = fields::patterns()?;
        let parsed = Self {
            name: fields::candidate_name(p, text),
            contact: fields::contact_info(p, text),
            education: fields::education(p, text),
            experience: fields::experience(p, text),
            skills: fields::skills(p, text),
            raw_text: text.to_string(),
        };
        log::debug!(
            "Parsed resume: {} education, {} experience, {} skills",
            parsed.education.len(),
            parsed.experience.len(),
            parsed.skills.len(),
        );
        Ok(parsed)
    }

    /// Structured fields first, then the full text, for the generation prompt.
    /// Absent fields are left out.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.name {
            let _ = writeln!(out, "Name: {name}");
        }
        let c = &self.contact;
        let contact = [
            ("Email", &c.email),
            ("Phone", &c.phone),
            ("LinkedIn", &c.linkedin),
            ("Website", &c.website),
            ("Location", &c.location),
        ];
        for (label, value) in contact {
            if let Some(value) = value {
                let _ = writeln!(out, "{label}: {value}");
            }
        }

        if !self.experience.is_empty() {
            out.push_str("Experience:\n");
            for e in &self.experience {
                let _ = write!(out, "- {}", e.company);
                if let Some(position) = &e.position {
                    let _ = write!(out, ", {position}");
                }
                if let Some(duration) = &e.duration {
                    let _ = write!(out, " ({duration})");
                }
                out.push('\n');
            }
        }
        if !self.education.is_empty() {
            out.push_str("Education:\n");
            for e in &self.education {
                let _ = write!(out, "- {}", e.institution);
                if let Some(degree) = &e.degree {
                    let _ = write!(out, ", {degree}");
                }
                if let Some(duration) = &e.duration {
                    let _ = write!(out, " ({duration})");
                }
                out.push('\n');
            }
        }
        if !self.skills.is_empty() {
            let _ = writeln!(out, "Skills: {}", self.skills.join(", "));
        }

        let _ = write!(out, "\nFull resume text:\n{}", self.raw_text.trim());
        out
    }
}
