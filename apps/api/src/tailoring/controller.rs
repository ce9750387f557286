//! Session controller — the Generate and Apply Feedback actions.
//!
//! Flow (Generate): validate input → run the four tasks concurrently →
//!       wrap each outcome in a `Section` → cache the cover letter in the session.
//!
//! A failing task only fails its own section. The session draft changes only when
//! the cover-letter task produced usable text.

use serde::Serialize;
use tracing::{info, warn};

use crate::documents::Documents;
use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::session::SessionState;
use crate::tailoring::prompts::SponsorshipVerdict;
use crate::tailoring::tasks;

pub const EMPTY_JOB_DESCRIPTION: &str = "Please paste a job description.";
pub const EMPTY_FEEDBACK: &str = "Please enter your feedback.";
pub const NO_DRAFT: &str = "Generate a cover letter before applying feedback.";

/// Index of the paragraph every rewrite must leave untouched.
const INVARIANT_PARAGRAPH: usize = 1;

/// One result block of the page. `Degraded` still carries a displayable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { value: T },
    Degraded { value: T, warning: String },
    Failed { message: String },
}

impl<T> Section<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Section::Ready { value } | Section::Degraded { value, .. } => Some(value),
            Section::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Section::Failed { .. })
    }

    /// Wraps a task result; `check` returns a warning for shape problems.
    fn from_result(
        task: &str,
        result: Result<T, AppError>,
        check: impl FnOnce(&T) -> Option<String>,
    ) -> Self {
        match result {
            Ok(value) => match check(&value) {
                Some(warning) => {
                    warn!("{task} output degraded: {warning}");
                    Section::Degraded { value, warning }
                }
                None => Section::Ready { value },
            },
            Err(e) => {
                warn!("{task} failed: {e}");
                Section::Failed {
                    message: e.user_message(),
                }
            }
        }
    }
}

/// The sponsorship answer as written, plus the category it was recognised as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorshipOutcome {
    pub text: String,
    pub verdict: Option<SponsorshipVerdict>,
}

/// Everything one Generate action produces, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub keywords: Section<Vec<String>>,
    pub cover_letter: Section<String>,
    pub sponsorship: Section<SponsorshipOutcome>,
    pub skill_gap: Section<String>,
}

/// Runs the Generate action. Blank input is rejected before any completion call.
pub async fn generate(
    llm: &dyn CompletionService,
    documents: &Documents,
    session: &mut SessionState,
    job_description: &str,
) -> Result<GenerateReport, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_JOB_DESCRIPTION.to_string()));
    }

    info!(
        "Generating for job description ({} chars) with {}",
        job_description.len(),
        llm.model()
    );

    // The four tasks share no data, so they run concurrently.
    let (keywords, cover_letter, sponsorship, skill_gap) = tokio::join!(
        tasks::extract_keywords(llm, job_description),
        tasks::rewrite_cover_letter(llm, job_description, &documents.cover_letter),
        tasks::classify_sponsorship(llm, job_description),
        tasks::analyze_skill_gap(llm, job_description, &documents.resume),
    );

    let keywords = Section::from_result("Keyword extraction", keywords, |terms| {
        terms
            .is_empty()
            .then(|| "The model returned no keywords.".to_string())
    });

    let cover_letter = Section::from_result("Cover letter rewrite", cover_letter, |text| {
        if text.is_empty() {
            Some("The model returned an empty cover letter.".to_string())
        } else if !tasks::paragraph_preserved(&documents.cover_letter, text, INVARIANT_PARAGRAPH)
        {
            Some("The second paragraph was changed by the rewrite; review it before sending.".to_string())
        } else {
            None
        }
    });

    let sponsorship = Section::from_result(
        "Sponsorship classification",
        sponsorship.map(|text| SponsorshipOutcome {
            verdict: SponsorshipVerdict::classify_text(&text),
            text,
        }),
        |outcome| {
            outcome
                .verdict
                .is_none()
                .then(|| "The answer did not match a known sponsorship category.".to_string())
        },
    );

    let skill_gap = Section::from_result("Skill gap analysis", skill_gap, |text| {
        text.is_empty()
            .then(|| "The model returned an empty analysis.".to_string())
    });

    let failed = [
        keywords.is_failed(),
        cover_letter.is_failed(),
        sponsorship.is_failed(),
        skill_gap.is_failed(),
    ]
    .into_iter()
    .filter(|f| *f)
    .count();
    info!("Generate finished: {failed} of 4 sections failed");

    if let Some(letter) = cover_letter.value() {
        if session.accept_draft(letter.clone()) {
            info!("Cover letter draft cached ({} chars)", letter.len());
        }
    }

    Ok(GenerateReport {
        keywords,
        cover_letter,
        sponsorship,
        skill_gap,
    })
}

/// Runs the Apply Feedback action against the cached draft and replaces it.
/// On any error the previous draft stays in place.
pub async fn apply_feedback(
    llm: &dyn CompletionService,
    session: &mut SessionState,
    feedback: &str,
) -> Result<String, AppError> {
    let draft = session
        .draft()
        .ok_or_else(|| AppError::Validation(NO_DRAFT.to_string()))?
        .to_string();

    if feedback.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_FEEDBACK.to_string()));
    }

    let updated = tasks::apply_feedback(llm, &draft, feedback).await?;

    if !session.accept_draft(updated.clone()) {
        return Err(AppError::Llm(
            "feedback_application returned an empty cover letter".to_string(),
        ));
    }

    info!("Feedback applied ({} chars)", updated.len());
    Ok(updated)
}
