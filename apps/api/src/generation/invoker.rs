//! Concurrent fan-out of the four section prompts.

use tracing::debug;

use crate::generation::prompts::PromptSet;
use crate::llm_client::{LlmError, TextGenerator};

/// Raw model output per section. Empty strings mean the response had no text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSections {
    pub skills: String,
    pub experience: String,
    pub projects: String,
    pub achievements: String,
}

/// Issues all four prompts concurrently and waits for every one to succeed.
/// Any single failure fails the whole set; there is no per-section fallback.
pub async fn generate_sections(
    generator: &dyn TextGenerator,
    prompts: &PromptSet,
) -> Result<GeneratedSections, LlmError> {
    let (skills, experience, projects, achievements) = tokio::try_join!(
        generator.generate(&prompts.skills),
        generator.generate(&prompts.experience),
        generator.generate(&prompts.projects),
        generator.generate(&prompts.achievements),
    )?;

    debug!(
        "Generated sections: skills={}b experience={}b projects={}b achievements={}b",
        skills.len(),
        experience.len(),
        projects.len(),
        achievements.len()
    );

    Ok(GeneratedSections {
        skills,
        experience,
        projects,
        achievements,
    })
}
