//! Prompt construction for the four rewritten resume sections.
//! Word limits and formats are instructions to the model; nothing here enforces them.

use crate::llm_client::prompts::{NA_SENTINEL, NO_PREAMBLE_INSTRUCTION, ROLE_FRAMING};
use crate::models::submission::Submission;

/// Company name used when the submission does not name a target.
pub const DEFAULT_COMPANY: &str = "a company";

/// One prompt per rewritten section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub skills: String,
    pub experience: String,
    pub projects: String,
    pub achievements: String,
}

/// Builds the four section prompts for a submission.
pub fn build_prompts(submission: &Submission) -> PromptSet {
    let company = target_company(submission.company.as_deref());
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    PromptSet {
        skills: skills_prompt(company, &field(&submission.skills)),
        experience: experience_prompt(company, &field(&submission.experience)),
        projects: projects_prompt(company, &field(&submission.projects)),
        achievements: achievements_prompt(company, &field(&submission.achievements)),
    }
}

fn target_company(company: Option<&str>) -> &str {
    match company.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_COMPANY,
    }
}

fn skills_prompt(company: &str, skills: &str) -> String {
    format!(
        "{ROLE_FRAMING}, your task is to enhance the provided skills for a software engineer's resume, \
specifically targeting a position at \"{company}\".
If the provided skills are missing or appear to be \"gibberish\", infer and list relevant and impactful \
technical and soft skills for a software engineer (e.g., Programming Languages, Frameworks, Tools, \
Databases, Cloud Platforms).
Format the output as a concise, professional, **comma-separated list of 5-10 key skills**. \
If skills are provided, do not add extra skills of your own.
**Strictly avoid bullet points, paragraphs, conversational text, or any preamble/postamble.** \
Provide only the comma-separated list. Keep the total output for skills under 50 words.

Skills to enhance: {skills}"
    )
}

fn experience_prompt(company: &str, experience: &str) -> String {
    format!(
        "{ROLE_FRAMING}, rewrite the following work experience for a software engineer's resume, \
targeting a position at \"{company}\".
Focus solely on achievements, quantifiable results, and responsibilities using strong action verbs.
If no experience is provided, return \"{NA_SENTINEL}\" ONLY.
**Format each experience entry using Markdown bullet points (e.g., '* Achieved X by doing Y').** \
Ensure each bullet point is concise (1-2 lines) and professional.
{NO_PREAMBLE_INSTRUCTION}
Keep the total output for experience concise, ideally under 100 words.

Experience to rewrite: {experience}"
    )
}

fn projects_prompt(company: &str, projects: &str) -> String {
    format!(
        "{ROLE_FRAMING}, enhance the descriptions of the following software engineering projects \
for a resume, targeting a position at \"{company}\".
For each project:
- Highlight technologies used (e.g., Python, React, AWS, SQL).
- Emphasize outcomes, impact, or features developed.
- Quantify results where possible.
If the provided project details are missing or \"gibberish\", infer and create 2-3 realistic and \
impactful software engineering project descriptions. Fill in any missing details like technologies \
or outcomes to make them professional and complete.
If projects are provided, do not add extra projects of your own.
**Format each project as a concise Markdown bullet point, starting with the project name \
(e.g., '* Project Name: Description...').** Each bullet point should be professional and not a paragraph.
{NO_PREAMBLE_INSTRUCTION}
Keep the total output for projects concise, ideally under 100 words.

Projects to enhance: {projects}"
    )
}

fn achievements_prompt(company: &str, achievements: &str) -> String {
    format!(
        "{ROLE_FRAMING}, rewrite the following achievements, targeting a position at \"{company}\".
Focus solely on impact, recognition, and specific contributions. Quantify results whenever possible.
If no achievements are provided, return \"{NA_SENTINEL}\" ONLY.
Fill in any missing details to make them professional.
**Format each achievement as a concise, professional Markdown bullet point.**
{NO_PREAMBLE_INSTRUCTION}
Keep the total output for achievements concise, ideally under 100 words.

Achievements to rewrite: {achievements}"
    )
}
