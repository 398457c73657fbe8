// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that keeps responses as plain prose.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Respond in plain text only. \
    Do NOT use JSON. \
    Do NOT include explanations of your reasoning process or apologies.";

/// Instruction to keep claims tied to the supplied documents.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base every observation on the resume and job description provided. \
    Do NOT invent experience, employers, or qualifications the candidate has not listed.";
