//! Task functions — one completion call per feature.
//!
//! Each task fills its template, calls the completion service once and normalizes
//! whitespace. Content is not validated here; correctness is the model's job.

use tracing::debug;

use crate::documents::paragraphs;
use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::tailoring::prompts::{
    PromptTemplate, SLOT_COVER_LETTER, SLOT_FEEDBACK, SLOT_JOB_DESCRIPTION,
    SLOT_MODIFIED_COVER_LETTER, SLOT_RESUME,
};

async fn run(
    llm: &dyn CompletionService,
    template: PromptTemplate,
    values: &[(&str, &str)],
) -> Result<String, AppError> {
    let prompt = template.fill(values)?;
    debug!(template = template.id(), prompt_len = prompt.len(), "Calling completion service");

    let completion = llm
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("{} call failed: {e}", template.id())))?;

    Ok(completion.text)
}

/// Top ATS terms, one per completion line. An empty completion gives an empty list.
pub async fn extract_keywords(
    llm: &dyn CompletionService,
    job_description: &str,
) -> Result<Vec<String>, AppError> {
    let raw = run(
        llm,
        PromptTemplate::AtsKeywords,
        &[(SLOT_JOB_DESCRIPTION, job_description)],
    )
    .await?;
    Ok(split_keywords(&raw))
}

/// Splits on line breaks, dropping blank lines and any list marker the model added
/// (`1.`, `2)`, `-`, `*`, `•`). No dedup and no count check.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.trim()
        .lines()
        .map(strip_list_marker)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim();
        }
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim();
        }
    }

    line
}

pub async fn rewrite_cover_letter(
    llm: &dyn CompletionService,
    job_description: &str,
    cover_letter: &str,
) -> Result<String, AppError> {
    let raw = run(
        llm,
        PromptTemplate::CoverLetterRewrite,
        &[
            (SLOT_JOB_DESCRIPTION, job_description),
            (SLOT_COVER_LETTER, cover_letter),
        ],
    )
    .await?;
    Ok(raw.trim().to_string())
}

/// Returns the model's verdict as written; see `SponsorshipVerdict::classify_text`.
pub async fn classify_sponsorship(
    llm: &dyn CompletionService,
    job_description: &str,
) -> Result<String, AppError> {
    let raw = run(
        llm,
        PromptTemplate::VisaSponsorship,
        &[(SLOT_JOB_DESCRIPTION, job_description)],
    )
    .await?;
    Ok(raw.trim().to_string())
}

pub async fn analyze_skill_gap(
    llm: &dyn CompletionService,
    job_description: &str,
    resume: &str,
) -> Result<String, AppError> {
    let raw = run(
        llm,
        PromptTemplate::SkillGap,
        &[(SLOT_JOB_DESCRIPTION, job_description), (SLOT_RESUME, resume)],
    )
    .await?;
    Ok(raw.trim().to_string())
}

pub async fn apply_feedback(
    llm: &dyn CompletionService,
    current_cover_letter: &str,
    feedback: &str,
) -> Result<String, AppError> {
    let raw = run(
        llm,
        PromptTemplate::FeedbackApplication,
        &[
            (SLOT_MODIFIED_COVER_LETTER, current_cover_letter),
            (SLOT_FEEDBACK, feedback),
        ],
    )
    .await?;
    Ok(raw.trim().to_string())
}

/// Whether paragraph `index` (0-based) of `original` survives verbatim in `rewritten`.
/// Surrounding whitespace is ignored; anything else counts as a change.
pub fn paragraph_preserved(original: &str, rewritten: &str, index: usize) -> bool {
    match (paragraphs(original).get(index), paragraphs(rewritten).get(index)) {
        (Some(before), Some(after)) => before == after,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::COVER_LETTER;
    use crate::llm_client::fake::FakeCompletion;

    #[test]
    fn test_split_keywords_basic() {
        assert_eq!(
            split_keywords("Python\nAWS\nDocker\nKubernetes\nTerraform"),
            vec!["Python", "AWS", "Docker", "Kubernetes", "Terraform"]
        );
    }

    #[test]
    fn test_split_keywords_empty_is_empty() {
        assert!(split_keywords("").is_empty());
        assert!(split_keywords("  \n\n ").is_empty());
    }

    #[test]
    fn test_split_keywords_strips_markers_and_blank_lines() {
        assert_eq!(
            split_keywords("\n1. Python\n\n2) AWS\n- Docker\n* CI/CD\n• C++\n"),
            vec!["Python", "AWS", "Docker", "CI/CD", "C++"]
        );
    }

    #[test]
    fn test_split_keywords_keeps_duplicates_and_extra_lines() {
        let terms = split_keywords("Rust\nRust\nGo\nC\nZig\nOCaml");
        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0], terms[1]);
    }

    #[test]
    fn test_split_keywords_bounded_by_segments() {
        let raw = "a\n\nb\n  \nc";
        assert!(split_keywords(raw).len() <= raw.split('\n').count());
    }

    #[test]
    fn test_marker_lookalikes_are_kept() {
        assert_eq!(strip_list_marker("3D modeling"), "3D modeling");
        assert_eq!(strip_list_marker("-fPIC"), "-fPIC");
        assert_eq!(strip_list_marker("10x engineering"), "10x engineering");
    }

    #[tokio::test]
    async fn test_extract_keywords_sends_job_description() {
        let llm = FakeCompletion::new().respond(PromptTemplate::AtsKeywords, " Python\nAWS \n");
        let terms = extract_keywords(&llm, "Requires Python and AWS").await.unwrap();
        assert_eq!(terms, vec!["Python", "AWS"]);
        assert_eq!(llm.call_count(), 1);
        assert!(llm.prompts()[0].contains("Requires Python and AWS"));
    }

    #[tokio::test]
    async fn test_text_tasks_trim_output() {
        let llm = FakeCompletion::new()
            .respond(PromptTemplate::CoverLetterRewrite, "\n  Letter body \n")
            .respond(PromptTemplate::VisaSponsorship, "  No mention of sponsorship.\n")
            .respond(PromptTemplate::SkillGap, "\t1. Kubernetes\n")
            .respond(PromptTemplate::FeedbackApplication, "  Updated  ");

        let letter = rewrite_cover_letter(&llm, "jd", COVER_LETTER).await.unwrap();
        let verdict = classify_sponsorship(&llm, "jd").await.unwrap();
        let gaps = analyze_skill_gap(&llm, "jd", "resume").await.unwrap();
        let updated = apply_feedback(&llm, "Letter body", "shorter").await.unwrap();

        for out in [&letter, &verdict, &gaps, &updated] {
            assert_eq!(out.trim(), out.as_str());
        }
        assert_eq!(letter, "Letter body");
        assert_eq!(verdict, "No mention of sponsorship.");
        assert_eq!(gaps, "1. Kubernetes");
        assert_eq!(updated, "Updated");
    }

    #[tokio::test]
    async fn test_prompts_carry_every_input() {
        let llm = FakeCompletion::new()
            .respond(PromptTemplate::SkillGap, "gaps")
            .respond(PromptTemplate::FeedbackApplication, "done");

        analyze_skill_gap(&llm, "JD-TEXT", "RESUME-TEXT").await.unwrap();
        apply_feedback(&llm, "LETTER-TEXT", "FEEDBACK-TEXT").await.unwrap();

        let prompts = llm.prompts();
        assert!(prompts[0].contains("JD-TEXT") && prompts[0].contains("RESUME-TEXT"));
        assert!(prompts[1].contains("LETTER-TEXT") && prompts[1].contains("FEEDBACK-TEXT"));
    }

    #[tokio::test]
    async fn test_service_failure_becomes_llm_error() {
        let llm = FakeCompletion::new().fail(PromptTemplate::VisaSponsorship, "boom");
        let err = classify_sponsorship(&llm, "jd").await.unwrap_err();
        match err {
            AppError::Llm(msg) => assert!(msg.contains("visa_sponsorship")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_paragraph_preserved_detects_verbatim_copy() {
        let rewritten = COVER_LETTER
            .lines()
            .enumerate()
            .map(|(i, p)| if i == 1 { p.to_string() } else { format!("New {i}") })
            .collect::<Vec<_>>()
            .join("\n\n");
        assert!(paragraph_preserved(COVER_LETTER, &rewritten, 1));
    }

    #[test]
    fn test_paragraph_preserved_detects_edit() {
        let rewritten = "One.\nBeyond software development, I like Rust.\nThree.";
        assert!(!paragraph_preserved(COVER_LETTER, rewritten, 1));
    }

    #[test]
    fn test_paragraph_preserved_false_when_missing() {
        assert!(!paragraph_preserved(COVER_LETTER, "Only one paragraph.", 1));
    }
}
