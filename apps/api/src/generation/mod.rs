// Resume generation: prompt construction, concurrent model calls, normalization
// and the POST /ask orchestration.
// All model calls go through llm_client, no direct Gemini calls here.

pub mod generator;
pub mod handlers;
pub mod invoker;
pub mod normalizer;
pub mod prompts;
