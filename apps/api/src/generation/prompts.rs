// Prompt constants for cover letter generation.

use crate::llm_client::ChatMessage;

/// System prompt. Replace `{language}` before sending.
pub const COVER_LETTER_SYSTEM_TEMPLATE: &str =
    "You are an expert career consultant who writes compelling, \
personalised cover letters.

Instructions:
- Analyse the candidate's resume and the job description carefully.
- Highlight the candidate's most relevant experience, skills, \
and achievements that match the job requirements.
- Write a professional cover letter in {language} language.
- Keep it concise (3-4 paragraphs) and engaging.
- Do NOT invent facts about the candidate; use only information \
from the resume.
- Output ONLY the cover letter text, no extra commentary.";

/// User prompt. Replace `{resume_text}` and `{job_description}` before sending.
pub const COVER_LETTER_USER_TEMPLATE: &str = "=== RESUME ===
{resume_text}

=== JOB DESCRIPTION ===
{job_description}";

/// System + user messages for one generation.
pub fn build_messages(resume_text: &str, job_description: &str, language: &str) -> Vec<ChatMessage> {
    let system = COVER_LETTER_SYSTEM_TEMPLATE.replace("{language}", language);
    // Job text first: a resume containing "{job_description}" must stay literal.
    let user = COVER_LETTER_USER_TEMPLATE
        .replace("{job_description}", job_description)
        .replacen("{resume_text}", resume_text, 1);
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
