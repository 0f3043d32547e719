//! Heuristic field extraction from resume text. Headings are only
//! recognized at the start of a line.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContactInfo, Education, Experience};
use crate::error::Error;

const SEPARATORS: [char; 4] = ['-', '\u{2013}', '|', ','];

const MAIL_PROVIDERS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

const KNOWN_SKILLS: &[&str] = &[
    "JavaScript", "Python", "Java", "C++", "C#", "Ruby", "PHP", "Swift", "Kotlin", "Go", "Rust",
    "TypeScript", "HTML", "CSS", "React", "Angular", "Vue", "Node.js", "Express", "Django",
    "Flask", "Spring", "ASP.NET", "SQL", "MySQL", "PostgreSQL", "MongoDB", "Oracle", "SQLite",
    "Redis", "Cassandra", "DynamoDB", "AWS", "Azure", "Google Cloud", "Docker", "Kubernetes",
    "Jenkins", "Git", "GitHub", "GitLab", "CI/CD", "Machine Learning", "AI", "Data Science",
    "Big Data", "Hadoop", "Spark", "TensorFlow", "PyTorch", "Leadership", "Communication",
    "Teamwork", "Problem Solving", "Critical Thinking", "Project Management", "Negotiation",
    "Sales", "Business Development", "Strategy", "P&L Management",
];

/// Below this many skills in a skills section, the whole text is scanned.
const MIN_SECTION_SKILLS: usize = 5;

pub(super) struct Patterns {
    name: Regex,
    email: Regex,
    phone: Regex,
    linkedin: Regex,
    website: Regex,
    location: Regex,
    education_section: Regex,
    experience_section: Regex,
    skills_section: Regex,
    institution: Regex,
    degree: Regex,
    year_range: Regex,
    month_range: Regex,
}

const MONTH: &str = "(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

/// A heading line, then everything up to the next listed heading line.
fn section_pattern(headings: &str, terminators: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?im)^[ \t]*(?:{headings})\b[^\n]*\n(?s:(.*?))(?:^[ \t]*(?:{terminators})\b|\z)"
    ))
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            name: Regex::new(r"(?m)^[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,2})[ \t]*$")?,
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone: Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")?,
            linkedin: Regex::new(r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+")?,
            website: Regex::new(
                r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b(?:/\S*)?",
            )?,
            location: Regex::new(
                r"(?im)\b(?:located in|location|address|city|state|country|region)\b[:\s]+([A-Za-z][A-Za-z ,.-]*)$",
            )?,
            education_section: section_pattern(
                "EDUCATION|ACADEMIC BACKGROUND|ACADEMIC CREDENTIALS|ACADEMIC HISTORY",
                "(?:WORK |PROFESSIONAL )?EXPERIENCE|EMPLOYMENT|(?:TECHNICAL |KEY |CORE |PROFESSIONAL )?SKILLS|PROJECTS|CERTIFICATIONS",
            )?,
            experience_section: section_pattern(
                "(?:WORK |PROFESSIONAL )?EXPERIENCE|EMPLOYMENT|WORK HISTORY",
                "EDUCATION|ACADEMIC|(?:TECHNICAL |KEY |CORE |PROFESSIONAL )?SKILLS|PROJECTS|CERTIFICATIONS",
            )?,
            skills_section: section_pattern(
                "(?:TECHNICAL |KEY |PROFESSIONAL )?SKILLS|CORE COMPETENCIES",
                "(?:WORK |PROFESSIONAL )?EXPERIENCE|EMPLOYMENT|EDUCATION|ACADEMIC|PROJECTS|CERTIFICATIONS",
            )?,
            institution: Regex::new(r"(?i)\b(?:University|College|School|Institute)\b")?,
            degree: Regex::new(
                r"(?i)\b(?:Bachelor|Master|PhD|BSc|BS|BA|MSc|MA|MBA|BBA|Diploma|Certificate)\b[^,\n]*",
            )?,
            year_range: Regex::new(
                r"(?i)\b(?:19|20)\d{2}\s*(?:-|\u{2013}|to)\s*(?:(?:19|20)\d{2}|Present|Current|Now)\b",
            )?,
            month_range: Regex::new(&format!(
                r"(?i)\b{MONTH}\.?\s+\d{{4}}\s*(?:-|\u{{2013}}|to)\s*(?:{MONTH}\.?\s+\d{{4}}|Present|Current|Now)\b"
            ))?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

pub(super) fn patterns() -> Result<&'static Patterns, Error> {
    PATTERNS
        .as_ref()
        .map_err(|e| Error::Resume(format!("bad field pattern: {e}")))
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().trim().to_string())
}

fn section<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// The first line that is two or three capitalized words.
pub(super) fn candidate_name(p: &Patterns, text: &str) -> Option<String> {
    p.name.captures(text).map(|c| c[1].to_string())
}

pub(super) fn contact_info(p: &Patterns, text: &str) -> ContactInfo {
    let website = p
        .website
        .find_iter(text)
        .filter(|m| !text[..m.start()].ends_with(['@', '.', '/']) && !text[m.end()..].starts_with('@'))
        .map(|m| m.as_str())
        .find(|site| {
            let lower = site.to_ascii_lowercase();
            !lower.contains("linkedin.com") && !MAIL_PROVIDERS.iter().any(|d| lower.contains(d))
        })
        .map(str::to_string);
    let location = p.location.captures(text).and_then(|c| {
        let place = c[1].trim().trim_end_matches(['.', ',']).trim();
        (!place.is_empty()).then(|| place.to_string())
    });

    ContactInfo {
        email: first_match(&p.email, text),
        phone: first_match(&p.phone, text),
        linkedin: first_match(&p.linkedin, text),
        website,
        location,
    }
}

/// An institution line plus the line after it, which usually holds the
/// degree or the dates.
pub(super) fn education(p: &Patterns, text: &str) -> Vec<Education> {
    let Some(body) = section(&p.education_section, text) else {
        return Vec::new();
    };
    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    let mut entries = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !p.institution.is_match(lines[i]) {
            i += 1;
            continue;
        }
        let next = lines.get(i + 1).copied().unwrap_or("");
        let entry = format!("{}\n{next}", lines[i]);
        entries.push(Education {
            institution: lines[i].to_string(),
            degree: first_match(&p.degree, &entry),
            duration: first_match(&p.year_range, &entry).or_else(|| first_match(&p.month_range, &entry)),
        });
        i += 2;
    }
    entries
}

/// One entry per date range. The line before the range reads
/// "company, position"; otherwise the two lines before it are company then
/// position.
pub(super) fn experience(p: &Patterns, text: &str) -> Vec<Experience> {
    let Some(body) = section(&p.experience_section, text) else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    let mut from = 0;
    for range in p.month_range.find_iter(body) {
        // A second range on the line of the previous one belongs to it.
        if range.start() < from {
            continue;
        }
        let lead: Vec<&str> = body[from..range.start()]
            .lines()
            .map(|l| l.trim().trim_matches(SEPARATORS).trim())
            .filter(|l| !l.is_empty())
            .collect();
        from = body[range.end()..]
            .find('\n')
            .map_or(body.len(), |nl| range.end() + nl);

        let Some(&last) = lead.last() else {
            continue;
        };
        let (company, position) = match last.split_once([',', '|']) {
            Some((company, position)) => (company.trim(), Some(position.trim())),
            None if lead.len() >= 2 => (lead[lead.len() - 2], Some(last)),
            None => (last, None),
        };
        entries.push(Experience {
            company: company.to_string(),
            position: position.filter(|s| !s.is_empty()).map(str::to_string),
            duration: Some(range.as_str().trim().to_string()),
        });
    }
    entries
}

/// Byte offset of the first `skill` in `text` on word boundaries. Short
/// names such as "Go" or "AI" must match case; longer ones match in any case.
fn find_skill(text: &str, lower: &str, skill: &str) -> Option<usize> {
    let (hay, needle) = if skill.len() <= 3 {
        (text, skill.to_string())
    } else {
        (lower, skill.to_ascii_lowercase())
    };
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '+' || c == '#';
    hay.match_indices(&needle).map(|(at, _)| at).find(|&at| {
        let before = hay[..at].chars().next_back();
        let after = hay[at + needle.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

fn known_skills(text: &str) -> Vec<(usize, &'static str)> {
    let lower = text.to_ascii_lowercase();
    let mut found: Vec<(usize, &'static str)> = KNOWN_SKILLS
        .iter()
        .filter_map(|&skill| find_skill(text, &lower, skill).map(|at| (at, skill)))
        .collect();
    found.sort_unstable();
    found
}

/// Skills named in a skills section (known names, then list items), topped
/// up from the whole text when the section yields few.
pub(super) fn skills(p: &Patterns, text: &str) -> Vec<String> {
    fn add(out: &mut Vec<String>, skill: &str) {
        if !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }

    let mut out = Vec::new();
    if let Some(body) = section(&p.skills_section, text) {
        for (_, skill) in known_skills(body) {
            add(&mut out, skill);
        }
        let items = body
            .split(['\n', ',', ';', '\u{2022}', '*', '|'])
            .map(|s| s.trim().trim_start_matches('-').trim())
            .filter(|s| !s.is_empty() && s.split_whitespace().count() <= 4)
            .filter(|s| {
                s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || " /+#.&".contains(c))
            });
        for item in items {
            add(&mut out, item);
        }
    }
    if out.len() < MIN_SECTION_SKILLS {
        for (_, skill) in known_skills(text) {
            add(&mut out, skill);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Doe
Sales Director
jane.doe@example.com | +1 415 555 0132
linkedin.com/in/janedoe | www.janedoe.co.uk
Location: London, United Kingdom.

EXPERIENCE
Acme Logistics Ltd, Head of Sales
Jan 2018 - Present
Built a partner channel across Europe.
Northwind Traders
Regional Manager
March 2012 to December 2017
Grew margins by 12% year on year.

EDUCATION
University of Leeds
BA Economics, 2008 - 2011

SKILLS
Negotiation, Team building, Salesforce
";

    fn p() -> &'static Patterns {
        patterns().expect("patterns compile")
    }

    #[test]
    fn name_is_the_first_capitalized_line() {
        assert_eq!(candidate_name(p(), RESUME).as_deref(), Some("Jane Doe"));
        assert_eq!(candidate_name(p(), "resume\n2024"), None);
    }

    #[test]
    fn contact_details() {
        let contact = contact_info(p(), RESUME);
        assert_eq!(contact.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("+1 415 555 0132"));
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/janedoe"));
        assert_eq!(contact.website.as_deref(), Some("www.janedoe.co.uk"));
        assert_eq!(contact.location.as_deref(), Some("London, United Kingdom"));
    }

    #[test]
    fn mail_domains_are_not_websites() {
        let contact = contact_info(p(), "Reach me at jd@gmail.com or jd@example.org");
        assert_eq!(contact.website, None);
        assert_eq!(contact.email.as_deref(), Some("jd@gmail.com"));
    }

    #[test]
    fn experience_entries_follow_date_ranges() {
        let entries = experience(p(), RESUME);
        assert_eq!(
            entries,
            [
                Experience {
                    company: "Acme Logistics Ltd".to_string(),
                    position: Some("Head of Sales".to_string()),
                    duration: Some("Jan 2018 - Present".to_string()),
                },
                Experience {
                    company: "Northwind Traders".to_string(),
                    position: Some("Regional Manager".to_string()),
                    duration: Some("March 2012 to December 2017".to_string()),
                },
            ]
        );
    }

    #[test]
    fn education_entries() {
        assert_eq!(
            education(p(), RESUME),
            [Education {
                institution: "University of Leeds".to_string(),
                degree: Some("BA Economics".to_string()),
                duration: Some("2008 - 2011".to_string()),
            }]
        );
        assert!(education(p(), "No schooling listed").is_empty());
    }

    #[test]
    fn skills_from_section_then_whole_text() {
        let skills = skills(p(), RESUME);
        assert_eq!(skills[0], "Negotiation");
        assert!(skills.contains(&"Team building".to_string()));
        assert!(skills.contains(&"Salesforce".to_string()));
        // Fewer than five in the section, so the whole text is scanned too.
        assert!(skills.contains(&"Sales".to_string()));
        assert_eq!(skills.iter().filter(|s| s.eq_ignore_ascii_case("negotiation")).count(), 1);
    }

    #[test]
    fn short_skill_names_need_exact_case_and_word_boundaries() {
        let found: Vec<&str> = known_skills("Going to market with AI and Rust, not rusty C++")
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(found, ["AI", "Rust", "C++"]);
    }
}
