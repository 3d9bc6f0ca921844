// src/ai/prompts.rs
//! Fixed prompt templates for article generation and chat-message extraction.

use crate::types::JobFields;

/// SEO article prompt. Optional fields get their advertised defaults here so
/// the rest of the pipeline never has to care about them.
pub fn article_prompt(job: &JobFields) -> String {
    let company = job.company.as_deref().unwrap_or("Confidential");
    let interview_details = match job.interview_date.as_deref() {
        Some(date) => format!(
            "Company: {}, Date: {}, Time: {}, Location: {}",
            company,
            date,
            job.interview_time.as_deref().unwrap_or("Not Specified"),
            job.interview_location.as_deref().unwrap_or("Not Specified"),
        ),
        None => "None".to_string(),
    };

    format!(
        r#"You are a professional SEO content writer and web designer. Create a high-quality, SEO-optimized job blog post with a stunning, premium design.

Job Details:
Job Title: {title}
Company: {company}
Location: {location}
Salary: {salary}
Job Type: {job_type}
Brief Requirements: {requirements}
Apply Link: {apply_link}
Apply Email: {apply_email}
Interview Details: {interview_details}

STRICT CONTENT STRUCTURE (SEO WINNING FORMULA):
1. Introduction (100-150 words): Engaging intro about the job and industry.
2. About Company (150-200 words): Detailed profile of the company.
3. Walk-in Interview Details (ONLY if Interview Details are provided): Create a high-visibility box with Company Name, Date, Time, and Venue.
4. Available Positions: List the main position and any related roles.
5. Job Requirements: Bulleted list of skills and qualifications.
6. Benefits: What the company offers (Salary, Insurance, etc.).
7. How to Apply: Clear instructions with the Apply Link/Email.
8. Important Notes: Key dates or specific instructions.
9. FAQ Section: 3-5 relevant questions and answers.
10. Conclusion: Final encouraging closing statement.

The article MUST be between 700 and 1000 words in total, with an H1 title that includes the job title and location.

DESIGN & FORMATTING RULES:
1. Output ONLY the HTML code. NO markdown blocks.
2. USE INLINE CSS for all styling (Blogger friendly).
3. NO <html>, <head>, or <body> tags.
4. MOBILE-FRIENDLY: Use width: 100%, max-width: 850px, font-size: 16px.
5. AESTHETICS:
   - Header Card: Gradient background (#1a2c5b to #0984e3), rounded corners (15px), white text.
   - Interview Box: A bright accent box (light yellow/orange background #fff3e0 with a #e67e22 border) to make walk-in details stand out.
   - Sections: Use <h2> with a bottom border or accent color.
   - Badges: Stylized tags for 'Location', 'Salary', 'Type'.
   - Buttons: Large, clickable styled buttons for Applying."#,
        title = job.title.as_deref().unwrap_or_default(),
        company = company,
        location = job.location.as_deref().unwrap_or_default(),
        salary = job.salary.as_deref().unwrap_or("Not Specified / Competitive"),
        job_type = job.job_type.as_deref().unwrap_or("Full-time"),
        requirements = job.requirements.as_deref().unwrap_or_default(),
        apply_link = job.apply_link.as_deref().unwrap_or_default(),
        apply_email = job.apply_email.as_deref().unwrap_or_default(),
        interview_details = interview_details,
    )
}

/// Extraction prompt: turn a free-text chat message into the fixed JSON field
/// set, with nulls for anything missing.
pub fn extraction_prompt(message: &str) -> String {
    format!(
        r#"Extract job details from this message into a JSON object.
Fields: title, location, requirements, company, salary, applyLink, applyEmail, type, interviewDate, interviewTime, interviewLocation.
If a field is missing, use null.

Message: "{message}"

Output ONLY the JSON object."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_prompt_defaults() {
        let job = JobFields {
            title: Some("Backend Engineer".to_string()),
            location: Some("Remote".to_string()),
            requirements: Some("3+ yrs Node".to_string()),
            ..Default::default()
        };
        let prompt = article_prompt(&job);
        assert!(prompt.contains("Job Title: Backend Engineer"));
        assert!(prompt.contains("Company: Confidential"));
        assert!(prompt.contains("Salary: Not Specified / Competitive"));
        assert!(prompt.contains("Job Type: Full-time"));
        assert!(prompt.contains("Interview Details: None"));
    }

    #[test]
    fn test_article_prompt_interview_block() {
        let job = JobFields {
            title: Some("Nurse".to_string()),
            location: Some("Abu Dhabi".to_string()),
            requirements: Some("DOH license".to_string()),
            company: Some("City Clinic".to_string()),
            interview_date: Some("2025-01-10".to_string()),
            interview_time: Some("10:00".to_string()),
            interview_location: Some("Main Branch".to_string()),
            ..Default::default()
        };
        let prompt = article_prompt(&job);
        assert!(prompt
            .contains("Company: City Clinic, Date: 2025-01-10, Time: 10:00, Location: Main Branch"));
    }

    #[test]
    fn test_extraction_prompt_embeds_message() {
        let prompt = extraction_prompt("We need a React Dev in Dubai");
        assert!(prompt.contains("We need a React Dev in Dubai"));
        assert!(prompt.contains("interviewLocation"));
    }
}
