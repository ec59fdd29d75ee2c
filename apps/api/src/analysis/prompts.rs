// Prompt constants for the summary requester.

/// Summary prompt template. Replace `{cv_text}` before sending; the
/// embedded CV text must already be truncated by the caller.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the following CV for a recruiter.

Cover, in order:
- Candidate name
- Total years of experience
- Key skills
- Education
- Notable achievements
- An estimated seniority level (junior, mid, senior, staff, or unknown)

Be concise and factual. Do not invent details that are not in the CV text.

CV TEXT:
{cv_text}"#;
