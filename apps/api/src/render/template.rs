use serde::Serialize;
use tera::{Context, Tera};

use crate::generation::invoker::GeneratedSections;
use crate::generation::normalizer::normalize_section;
use crate::models::submission::Submission;
use crate::render::RenderError;

const TEMPLATE_NAME: &str = "resume.html";
const TEMPLATE_SOURCE: &str = include_str!("../../templates/resume.html.tera");

/// Template context. Field names are the template's contract.
///
/// `skills` is plain text. `projects`, `achievements` and `experience` hold an HTML
/// fragment or the literal `"NA"`, which the template treats as "omit this section".
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ResumeView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub college: String,
    pub degree: String,
    pub year: String,
    pub skills: String,
    pub projects: String,
    pub achievements: String,
    pub experience: String,
}

impl ResumeView {
    /// Combines identity fields with normalized model output.
    /// Skills are never run through the markdown converter.
    pub fn assemble(submission: &Submission, generated: GeneratedSections) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: text(&submission.name),
            email: text(&submission.email),
            phone: text(&submission.phone),
            linkedin: text(&submission.linkedin),
            college: text(&submission.college),
            degree: text(&submission.degree),
            year: text(&submission.year),
            skills: generated.skills,
            projects: normalize_section(&generated.projects),
            achievements: normalize_section(&generated.achievements),
            experience: normalize_section(&generated.experience),
        }
    }
}

/// The resume template, parsed once at startup and shared across requests.
#[derive(Clone)]
pub struct ResumeTemplate {
    tera: Tera,
}

impl ResumeTemplate {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { tera })
    }

    /// Renders a complete HTML document. Identity fields and skills are HTML-escaped.
    pub fn render(&self, view: &ResumeView) -> Result<String, RenderError> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}
