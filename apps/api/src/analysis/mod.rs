// Readiness analysis: skill matching, scoring, learning timeline and feedback.
// Delegated feedback goes through llm_client, never directly to the provider.

pub mod feedback;
pub mod handlers;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod timeline;
pub mod vocabulary;
