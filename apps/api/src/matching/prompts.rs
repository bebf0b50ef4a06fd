// Resume-matching prompt template.
// The reply format requested here is what callers of /match_resume expect to
// see in `result`; it is never checked on our side.

pub const EVALUATOR_INSTRUCTION: &str = "You are an AI resume evaluator. \
Compare the following resume to the job description and give a match score out of 100, \
and give brief feedback.";

pub const RESPONSE_FORMAT: &str = "Respond in the following format:\n\
\n\
Match Score: XX/100\n\
Feedback: <feedback>";

/// Builds the scoring prompt. Pure: the same inputs always give the same string,
/// and empty inputs still give a well-formed prompt.
///
/// Both inputs are inserted in a single pass, so placeholder-looking text inside
/// a resume is never substituted a second time.
pub fn compose_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{EVALUATOR_INSTRUCTION}\n\
         \n\
         Resume:\n\
         {resume_text}\n\
         \n\
         Job Description:\n\
         {job_description}\n\
         \n\
         {RESPONSE_FORMAT}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let prompt = compose_prompt("Experienced Python developer", "Looking for a Python developer");
        let instruction = prompt.find("You are an AI resume evaluator.").unwrap();
        let resume = prompt.find("Resume:\nExperienced Python developer\n").unwrap();
        let jd = prompt
            .find("Job Description:\nLooking for a Python developer\n")
            .unwrap();
        let format = prompt.find("Respond in the following format:").unwrap();
        let score = prompt.find("Match Score: XX/100\nFeedback: <feedback>").unwrap();
        assert!(instruction < resume && resume < jd && jd < format && format < score);
    }

    #[test]
    fn test_exact_layout() {
        let expected = "You are an AI resume evaluator. Compare the following resume to the job \
description and give a match score out of 100, and give brief feedback.\n\
\n\
Resume:\n\
R\n\
\n\
Job Description:\n\
J\n\
\n\
Respond in the following format:\n\
\n\
Match Score: XX/100\n\
Feedback: <feedback>\n";
        assert_eq!(compose_prompt("R", "J"), expected);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let inputs = [("", ""), ("resume", ""), ("", "jd"), ("multi\nline", "jd\n\n")];
        for (resume, jd) in inputs {
            assert_eq!(compose_prompt(resume, jd), compose_prompt(resume, jd));
        }
    }

    #[test]
    fn test_empty_inputs_keep_section_labels() {
        let prompt = compose_prompt("", "");
        assert!(prompt.contains("Resume:\n\n\nJob Description:\n\n\nRespond"));
    }

    #[test]
    fn test_inputs_are_inserted_verbatim() {
        let resume = "Skills: {job_description} & <html>";
        let prompt = compose_prompt(resume, "Rust");
        assert!(prompt.contains("Resume:\nSkills: {job_description} & <html>\n"));
        assert!(prompt.contains("Job Description:\nRust\n"));
    }
}
