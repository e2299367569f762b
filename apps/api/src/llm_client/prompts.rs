// Shared prompt fragments used by every generation prompt.
// Section-specific prompts live in generation/prompts.rs.

/// Opening role framing for every prompt.
pub const ROLE_FRAMING: &str = "As a professional resume writing expert";

/// Marker the model returns for a section with no usable input.
/// The template treats it as "omit this section".
pub const NA_SENTINEL: &str = "NA";

/// Instruction appended to every prompt so the output can be used verbatim.
pub const NO_PREAMBLE_INSTRUCTION: &str = "**Your output will be used directly in the resume. \
    Do not use paragraphs, conversational text, or any preamble/postamble.**";
