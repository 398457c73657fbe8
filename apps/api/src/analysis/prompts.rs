// LLM prompt constants for delegated feedback.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Resume characters included in the feedback prompt. Longer resumes are cut.
pub const RESUME_CHAR_BUDGET: usize = 3000;

/// System prompt for feedback generation.
pub const FEEDBACK_SYSTEM: &str = "You are an experienced campus placement mentor and technical recruiter. \
    You review a candidate's resume against a job description and give concise, \
    actionable advice on how to become ready for the role.";

/// Feedback prompt template.
/// Replace: {grounding_instruction}, {plain_text_instruction}, {resume_text},
///          {job_description}, {missing_skills}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{plain_text_instruction}

RESUME (may be truncated):
{resume_text}

JOB DESCRIPTION:
{job_description}

SKILLS THE RESUME DOES NOT SHOW:
{missing_skills}

Write short feedback for the candidate covering:
1. Strengths the resume already shows for this role
2. The most important gaps and how to close them
3. One concrete suggestion to improve the resume itself"#;
