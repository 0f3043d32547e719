//! Request handling around the layout core: prompt construction, the text
//! provider, and the optional storage and CRM destinations for the PDF.

use std::path::PathBuf;

use base64::Engine;

use crate::config::ReportConfig;
use crate::error::Error;
use crate::fonts::FontSet;
use crate::layout::LayoutEngine;
use crate::pdf::{self, Logo};
use crate::resume::ParsedResume;

/// Where the client's background comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    LinkedIn(String),
    /// Resume as plain text.
    Resume(String),
    ParsedResume(ParsedResume),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRequest {
    pub name: String,
    pub email: String,
    pub profile: Profile,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        let profile_blank = match &self.profile {
            Profile::LinkedIn(url) => url.trim().is_empty(),
            Profile::Resume(text) => text.trim().is_empty(),
            Profile::ParsedResume(resume) => resume.raw_text.trim().is_empty(),
        };
        if profile_blank {
            missing.push("linkedin URL or resume");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidRequest(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_INSTRUCTIONS: &str = "\
You are a professional business analyst creating value-add reports for clients.

Your reports should be insightful, actionable, and tailored to the individual's professional background.
Use a warm, professional tone and include specific, actionable insights.

Format the report with clear section headers and bullet points for key information.
Ensure the content feels personalized and targeted to the individual's career trajectory.";

pub fn build_prompt<S: AsRef<str>>(request: &ReportRequest, titles: &[S]) -> Prompt {
    let name = request.name.trim();
    let email = request.email.trim();
    let source = match &request.profile {
        Profile::LinkedIn(url) => format!("LinkedIn profile {}.", url.trim()),
        Profile::Resume(text) => format!("the following resume:\n\n{}\n", text.trim()),
        Profile::ParsedResume(resume) => {
            format!("the following resume details:\n\n{}\n", resume.summary())
        }
    };
    let numbered: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.as_ref()))
        .collect();

    let user = format!(
        "Generate a value-add report for {name} with email {email} and {source}

The report should start with a personalized introduction addressing the client by name.

Include these exact sections in this order:
{sections}

For each section:
- Use the exact section title as listed above
- Provide 3-5 bullet points of specific insights where appropriate
- Keep content concise but high-value
- Include industry-specific terminology and insights
- Focus on actionable guidance

Total length should be 1000-1500 words.",
        sections = numbered.join("\n"),
    );

    Prompt {
        system: SYSTEM_INSTRUCTIONS.to_string(),
        user,
    }
}

/// Produces the free-form report text for a prompt.
pub trait TextGenerator {
    fn generate(&self, prompt: &Prompt) -> Result<String, Error>;
}

/// Text produced ahead of time, e.g. read from a file.
pub struct PregeneratedText(pub String);

impl TextGenerator for PregeneratedText {
    fn generate(&self, _prompt: &Prompt) -> Result<String, Error> {
        Ok(self.0.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredFile {
    pub id: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CrmRecord {
    pub id: String,
}

/// Destination for the finished PDF. `None` means the file was not stored;
/// delivery of the report continues either way.
pub trait StorageSink {
    fn store(&self, pdf: &[u8], file_name: &str) -> Option<StoredFile>;
}

pub trait CrmSink {
    fn attach(&self, pdf: &[u8], file_name: &str, client_email: &str) -> Option<CrmRecord>;
}

/// Stores reports as files in a local directory, creating it on demand.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StorageSink for DirectorySink {
    fn store(&self, pdf: &[u8], file_name: &str) -> Option<StoredFile> {
        let path = self.dir.join(file_name);
        let written = std::fs::create_dir_all(&self.dir).and_then(|()| std::fs::write(&path, pdf));
        if let Err(e) = written {
            log::warn!("Could not store {}: {e}", path.display());
            return None;
        }
        let link = std::fs::canonicalize(&path).unwrap_or(path);
        Some(StoredFile {
            id: file_name.to_string(),
            link: format!("file://{}", link.display()),
        })
    }
}

/// `Jane Doe` at 1700000000000 → `Jane_Doe_Value_Add_Report_1700000000000.pdf`
pub fn report_file_name(name: &str, unix_millis: u128) -> String {
    let stem: Vec<String> = name
        .split_whitespace()
        .map(|w| w.replace(['/', '\\'], "_"))
        .collect();
    format!("{}_Value_Add_Report_{unix_millis}.pdf", stem.join("_"))
}

fn now_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub stored: Option<StoredFile>,
    pub crm: Option<CrmRecord>,
}

impl ReportOutcome {
    /// The PDF for inline download in a response body.
    pub fn pdf_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.pdf)
    }
}

/// Request in, PDF and delivery results out. Collaborators are injected; the
/// pipeline owns none of them.
pub struct ReportPipeline<'a> {
    generator: &'a dyn TextGenerator,
    config: &'a ReportConfig,
    fonts: &'a FontSet,
    logo: Option<&'a Logo>,
    storage: Option<&'a dyn StorageSink>,
    crm: Option<&'a dyn CrmSink>,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(generator: &'a dyn TextGenerator, config: &'a ReportConfig, fonts: &'a FontSet) -> Self {
        Self {
            generator,
            config,
            fonts,
            logo: None,
            storage: None,
            crm: None,
        }
    }

    pub fn with_logo(mut self, logo: Option<&'a Logo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_storage(mut self, storage: &'a dyn StorageSink) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_crm(mut self, crm: &'a dyn CrmSink) -> Self {
        self.crm = Some(crm);
        self
    }

    pub fn run(&self, request: &ReportRequest) -> Result<ReportOutcome, Error> {
        request.validate()?;
        let prompt = build_prompt(request, &self.config.section_titles);

        let text = self.generator.generate(&prompt)?;
        if text.trim().is_empty() {
            return Err(Error::Generation("provider returned no text".to_string()));
        }

        let doc = LayoutEngine::new(self.config, self.fonts).layout(
            &request.name,
            &request.email,
            &text,
            self.logo.is_some(),
        );
        let pdf = pdf::write(&doc, self.fonts, self.logo)?;
        let file_name = report_file_name(&request.name, now_millis());
        log::info!("Generated {file_name}: {} pages, {} bytes", doc.page_count(), pdf.len());

        let stored = self.storage.and_then(|s| s.store(&pdf, &file_name));
        let crm = self
            .crm
            .and_then(|c| c.attach(&pdf, &file_name, request.email.trim()));

        Ok(ReportOutcome {
            file_name,
            pdf,
            stored,
            crm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReportRequest {
        ReportRequest {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            profile: Profile::LinkedIn("https://linkedin.com/in/janedoe".to_string()),
        }
    }

    #[test]
    fn validation_names_missing_fields() {
        assert!(request().validate().is_ok());
        let bad = ReportRequest {
            name: "  ".to_string(),
            email: String::new(),
            profile: Profile::Resume("\n".to_string()),
        };
        match bad.validate() {
            Err(Error::InvalidRequest(msg)) => {
                assert_eq!(msg, "missing required fields: name, email, linkedin URL or resume")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn file_name_replaces_whitespace() {
        assert_eq!(
            report_file_name("Jane  Mary Doe", 1_700_000_000_000),
            "Jane_Mary_Doe_Value_Add_Report_1700000000000.pdf"
        );
        assert_eq!(report_file_name("a/b", 1), "a_b_Value_Add_Report_1.pdf");
    }

    #[test]
    fn prompt_lists_titles_in_order() {
        let prompt = build_prompt(&request(), &["Alpha", "Beta"]);
        assert!(prompt.user.starts_with(
            "Generate a value-add report for Jane Doe with email jane@x.com and LinkedIn profile https://linkedin.com/in/janedoe."
        ));
        assert!(prompt.user.contains("1. Alpha\n2. Beta\n"));
        assert!(prompt.system.contains("bullet points"));

        let resume = ReportRequest {
            profile: Profile::Resume("Ten years in logistics.".to_string()),
            ..request()
        };
        assert!(build_prompt(&resume, &["A"]).user.contains("the following resume:\n\nTen years in logistics.\n"));
    }

    #[test]
    fn parsed_resume_prompt_carries_the_summary() {
        let resume = ParsedResume::from_text("Jane Doe\nSKILLS\nNegotiation, Pricing\n").unwrap();
        let request = ReportRequest {
            profile: Profile::ParsedResume(resume),
            ..request()
        };
        assert!(request.validate().is_ok());
        let user = build_prompt(&request, &["A"]).user;
        assert!(user.contains("the following resume details:\n\nName: Jane Doe\n"));
        assert!(user.contains("Skills: Negotiation, Pricing\n"));

        let blank = ReportRequest {
            profile: Profile::ParsedResume(ParsedResume::from_text(" \n").unwrap()),
            ..self::request()
        };
        assert!(matches!(blank.validate(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn outcome_encodes_the_pdf() {
        let outcome = ReportOutcome {
            file_name: "a.pdf".to_string(),
            pdf: b"%PDF-1.7".to_vec(),
            stored: None,
            crm: None,
        };
        assert_eq!(outcome.pdf_base64(), "JVBERi0xLjc=");
    }

    #[test]
    fn empty_generation_is_an_error() {
        let config = ReportConfig::default();
        let fonts = FontSet::builtin();
        let generator = PregeneratedText("   ".to_string());
        let err = ReportPipeline::new(&generator, &config, &fonts)
            .run(&request())
            .unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
