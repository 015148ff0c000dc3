// Prompt for the resume tailoring call.
// The layout engine relies on the formatting rules below: one `# Name` line,
// `## ` headings, `* `/`- ` bullets, and nothing before the name.

const TAILOR_PROMPT_TEMPLATE: &str = "\
You are an expert resume writer and ATS (Applicant Tracking System) optimization specialist. \
Your task is to rewrite the provided \"Base Resume\" into a highly effective, tailored resume for \
the specific \"Job Description\", optimizing for both human readability and ATS parsing. \
**Your output MUST strictly reflect the skills, experiences, and qualifications present in the \
\"Base Resume\", tailored for relevance to the \"Job Description\". Do NOT invent skills, \
experiences, or express willingness for training unless explicitly stated in the \"Base Resume\".**

**Core Objectives:**
1. **ATS Compatibility:** Ensure standard section headings and clear Markdown formatting.
2. **Human-Written Tone:** Write naturally, professionally, and confidently.
3. **Highlight & Tailor Relevant Experience:** Emphasize relevant skills/accomplishments from the \
Base Resume. Adjust experience wording using job description keywords where accurate, preserving \
core meaning. The summary must reflect the candidate's core strengths as presented in the Base \
Resume, tailored to the Job Description.
4. **Conciseness (Aim for One Page):** Prioritize impact, remove irrelevant details, keep the \
Summary to 2-4 sentences. Strive for one page.

**Formatting Requirements (Strict):**
* Use '# Name' for the candidate's name (top only).
* Use '## Section Heading' for main titles: Summary, Experience, Education, Skills.
* Use standard Markdown bullet points (* or -).
* Use '**bold text**' sparingly for emphasis.

**Process:**
1. Understand Job Description & Base Resume.
2. Rewrite the Base Resume applying all objectives and formatting, adhering strictly to the Base \
Resume's content while tailoring for relevance.
3. **CRITICAL OUTPUT RULE:**
   * Output *only* the complete resume content starting DIRECTLY with the candidate's name.
   * Do NOT include ANY introductory text, concluding remarks, or markdown code fences.
   * Only include contact information elements if explicitly provided in the Base Resume. Do NOT add placeholders.

**Job Description:**
---
{job_description}
---

**Base Resume:**
---
{base_resume}
---

**Tailored Resume Output:**
";

const JOB_DESCRIPTION_SLOT: &str = "{job_description}";
const BASE_RESUME_SLOT: &str = "{base_resume}";

/// Fills both slots in one pass; user text is never rescanned for slots.
pub fn build_tailor_prompt(job_description: &str, base_resume: &str) -> String {
    let (head, rest) = TAILOR_PROMPT_TEMPLATE
        .split_once(JOB_DESCRIPTION_SLOT)
        .unwrap_or((TAILOR_PROMPT_TEMPLATE, ""));
    let (middle, tail) = rest.split_once(BASE_RESUME_SLOT).unwrap_or((rest, ""));

    let mut prompt = String::with_capacity(
        TAILOR_PROMPT_TEMPLATE.len() + job_description.len() + base_resume.len(),
    );
    for piece in [head, job_description, middle, base_resume, tail] {
        prompt.push_str(piece);
    }
    prompt
}
