// Prompts for LLM commentary on resumes and job descriptions.
// Placeholders in {braces} are filled with str::replace before sending.

/// Resume characters sent with the strengths/weaknesses prompt.
pub const STRENGTHS_RESUME_CHARS: usize = 4000;
/// Characters of each document sent with the fit-assessment prompt.
pub const FIT_DOCUMENT_CHARS: usize = 2000;

pub const STRENGTHS_SYSTEM_TEMPLATE: &str = "\
You are a career advisor. Analyze the provided resume text. \
Identify 3-5 key strengths (e.g., specific skills, experiences, achievements) \
and 3-5 weaknesses (e.g., gaps in experience, missing skills, unclear sections). \
Use the top TF-IDF keywords for context: {top_terms}. \
Return the response in JSON format: \
{\"strengths\": [\"bullet1\", \"bullet2\", ...], \"weaknesses\": [\"bullet1\", \"bullet2\", ...]}.";

pub const FIT_SYSTEM_TEMPLATE: &str = "\
You are a hiring manager. Assess how well the provided resume fits the job description, \
considering the cosine similarity score ({similarity_score}) and top common keywords ({common_terms}). \
Provide: 1. Estimated fit percentage (0-100%). 2. 3-5 reasons why the resume fits well. \
3. 3-5 suggestions for improving the resume to better match the job. \
Return the response in JSON format: \
{\"fit_percentage\": int, \"reasons\": [\"bullet1\", \"bullet2\", ...], \"suggestions\": [\"bullet1\", \"bullet2\", ...]}.";

pub const FIT_USER_TEMPLATE: &str = "Resume: {resume_text}\n\nJob Description: {jd_text}";

pub const REVIEW_SYSTEM: &str =
    "You are a professional career coach with expertise in resume analysis.";

pub const REVIEW_PROMPT_TEMPLATE: &str = r#"
You are an expert career coach analyzing a resume to identify areas for improvement. Your task is to:
- Identify missing or weak sections (e.g., skills, extracurricular activities, certifications, work experience).
- Suggest specific improvements to make the resume stronger for job applications.
- Highlight any critical gaps, such as missing technical skills, leadership experience, or relevant activities.
- Provide concise, actionable advice for the candidate.

Resume Text:
{resume_text}

{job_description_section}

IMPORTANT: You MUST respond with a valid JSON object in exactly this format:
{
    "deficiencies": ["weakness 1", "weakness 2", "weakness 3"],
    "suggestions": ["suggestion 1", "suggestion 2", "suggestion 3"],
    "critical_gaps": ["gap 1", "gap 2", "gap 3"]
}

Do not include any text before or after the JSON object. Only return the JSON.
"#;

pub const REVIEW_JOB_SECTION_TEMPLATE: &str = "Job Description for Context:\n{jd_text}\n\n\
Please tailor your analysis to align with the job description where relevant.";
