//! Prompt Template Registry — the five fixed prompt skeletons and their placeholder slots.
//!
//! Placeholders are `{slot}` tokens. Filling is a single left-to-right pass over the
//! skeleton, so text supplied by the user is copied verbatim and never re-scanned for
//! placeholders.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{template}' is missing a value for slot '{slot}'")]
    MissingSlot {
        template: &'static str,
        slot: &'static str,
    },

    #[error("template '{template}' has no slot named '{slot}'")]
    UnknownSlot {
        template: &'static str,
        slot: String,
    },
}

pub const SLOT_JOB_DESCRIPTION: &str = "job_description";
pub const SLOT_COVER_LETTER: &str = "cover_letter";
pub const SLOT_RESUME: &str = "resume";
pub const SLOT_MODIFIED_COVER_LETTER: &str = "modified_cover_letter";
pub const SLOT_FEEDBACK: &str = "feedback";

/// ATS keyword extraction. Replace `{job_description}`.
const ATS_KEYWORDS_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) analyst. Given the following job description, identify and list the top 5 most important technical terms or skills that should be present in a resume for a good ATS match. Only provide the list of 5 terms, one per line, nothing else.

Job Description:
{job_description}

Top 5 Technical Terms:"#;

/// Cover letter rewrite. Replace `{job_description}`, `{cover_letter}`.
const COVER_LETTER_REWRITE_TEMPLATE: &str = r#"You are an expert in crafting professional cover letters. Given the job description and the existing cover letter below, modify the cover letter to align with the job description while maintaining the original flow and tone of the letter.
Only make changes that improve relevance to the new job role.
The first paragraph's first couple of lines should be changed to show how my passion resonates with the company and what excites me. Express it creatively and share genuine enthusiasm, followed by the internship experience already described in that paragraph.
The second paragraph must remain unchanged, character for character.
The third paragraph should be completely rewritten. Start by stating why I would like to work for the company and which opportunity there aligns with my career goals. The last line should say why I would be an asset to them.
Return only the three paragraphs of the letter.

Job Description:
{job_description}

Original Cover Letter:
{cover_letter}

Modified Cover Letter:"#;

/// Visa sponsorship classification. Replace `{job_description}`.
const VISA_SPONSORSHIP_TEMPLATE: &str = r#"You are an expert in analyzing job descriptions. Given the job description below, determine if the company offers visa sponsorship for this position.
If the job description mentions that sponsorship is available, or that the company sponsors visas, state "This job offers visa sponsorship."
If the job description mentions that only citizens, permanent residents, or those with security clearance can apply, or if there is any indication that sponsorship is not available, state "This job does not sponsor work visas."
If the job description does not mention anything about visa sponsorship, state "No mention of sponsorship."
Respond with exactly one of those three sentences and nothing else.

Job Description:
{job_description}

Visa Sponsorship Information:"#;

/// Skill gap analysis. Replace `{job_description}`, `{resume}`.
const SKILL_GAP_TEMPLATE: &str = r#"You are an experienced technical recruiter and career coach. Compare the job description with the candidate's resume below and identify the 3 to 5 most significant skill gaps: skills, tools, or experience the job asks for that the resume does not demonstrate.
For each gap, give a short title, one or two sentences explaining why it matters for this role, and a concrete suggestion for how the candidate could close it (a project, course, or certification).
Number the gaps. Do not list skills the resume already covers.

Job Description:
{job_description}

Resume:
{resume}

Skill Gap Analysis:"#;

/// Feedback application. Replace `{modified_cover_letter}`, `{feedback}`.
const FEEDBACK_APPLICATION_TEMPLATE: &str = r#"You are a skilled cover letter editor. Given the modified cover letter below, apply the following feedback to make further improvements while maintaining the overall flow and tone.
Return only the updated cover letter.

Modified Cover Letter:
{modified_cover_letter}

Feedback:
{feedback}

Updated Cover Letter:"#;

/// Identifies one of the fixed prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    AtsKeywords,
    CoverLetterRewrite,
    VisaSponsorship,
    SkillGap,
    FeedbackApplication,
}

impl PromptTemplate {
    pub fn all() -> [PromptTemplate; 5] {
        [
            PromptTemplate::AtsKeywords,
            PromptTemplate::CoverLetterRewrite,
            PromptTemplate::VisaSponsorship,
            PromptTemplate::SkillGap,
            PromptTemplate::FeedbackApplication,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            PromptTemplate::AtsKeywords => "ats_keywords",
            PromptTemplate::CoverLetterRewrite => "cover_letter_rewrite",
            PromptTemplate::VisaSponsorship => "visa_sponsorship",
            PromptTemplate::SkillGap => "skill_gap",
            PromptTemplate::FeedbackApplication => "feedback_application",
        }
    }

    pub fn slots(self) -> &'static [&'static str] {
        match self {
            PromptTemplate::AtsKeywords | PromptTemplate::VisaSponsorship => {
                &[SLOT_JOB_DESCRIPTION]
            }
            PromptTemplate::CoverLetterRewrite => &[SLOT_JOB_DESCRIPTION, SLOT_COVER_LETTER],
            PromptTemplate::SkillGap => &[SLOT_JOB_DESCRIPTION, SLOT_RESUME],
            PromptTemplate::FeedbackApplication => &[SLOT_MODIFIED_COVER_LETTER, SLOT_FEEDBACK],
        }
    }

    pub fn skeleton(self) -> &'static str {
        match self {
            PromptTemplate::AtsKeywords => ATS_KEYWORDS_TEMPLATE,
            PromptTemplate::CoverLetterRewrite => COVER_LETTER_REWRITE_TEMPLATE,
            PromptTemplate::VisaSponsorship => VISA_SPONSORSHIP_TEMPLATE,
            PromptTemplate::SkillGap => SKILL_GAP_TEMPLATE,
            PromptTemplate::FeedbackApplication => FEEDBACK_APPLICATION_TEMPLATE,
        }
    }

    /// Substitutes every `{slot}` in the skeleton with its supplied value.
    ///
    /// Fails when a slot has no value or a value names a slot the template doesn't have.
    /// Braces that don't enclose a slot name are copied through untouched.
    pub fn fill(self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        if let Some((name, _)) = values
            .iter()
            .find(|(name, _)| !self.slots().iter().any(|slot| slot == name))
        {
            return Err(TemplateError::UnknownSlot {
                template: self.id(),
                slot: name.to_string(),
            });
        }

        let lookup = |slot: &'static str| {
            values
                .iter()
                .find(|(name, _)| *name == slot)
                .map(|(_, value)| *value)
                .ok_or(TemplateError::MissingSlot {
                    template: self.id(),
                    slot,
                })
        };

        // Resolve everything up front so a missing slot fails even if it never appears.
        let resolved = self
            .slots()
            .iter()
            .map(|&slot| lookup(slot).map(|value| (slot, value)))
            .collect::<Result<Vec<_>, _>>()?;

        let skeleton = self.skeleton();
        let mut out = String::with_capacity(
            skeleton.len() + resolved.iter().map(|(_, v)| v.len()).sum::<usize>(),
        );
        let mut rest = skeleton;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let token = after
                .find('}')
                .map(|close| (&after[..close], close))
                .and_then(|(name, close)| {
                    resolved
                        .iter()
                        .find(|(slot, _)| *slot == name)
                        .map(|(_, value)| (*value, close))
                });

            match token {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

/// The three canonical answers of the sponsorship template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorshipVerdict {
    Offers,
    DoesNotSponsor,
    NoMention,
}

impl SponsorshipVerdict {
    pub fn phrase(self) -> &'static str {
        match self {
            SponsorshipVerdict::Offers => "This job offers visa sponsorship.",
            SponsorshipVerdict::DoesNotSponsor => "This job does not sponsor work visas.",
            SponsorshipVerdict::NoMention => "No mention of sponsorship.",
        }
    }

    /// Recognises a completion as one of the canonical phrases, tolerating case, a
    /// missing trailing period, and surrounding text.
    pub fn classify_text(text: &str) -> Option<SponsorshipVerdict> {
        let normalized = text.trim().to_lowercase();
        [
            SponsorshipVerdict::DoesNotSponsor,
            SponsorshipVerdict::Offers,
            SponsorshipVerdict::NoMention,
        ]
        .into_iter()
        .find(|verdict| {
            let phrase = verdict.phrase().trim_end_matches('.').to_lowercase();
            normalized.contains(&phrase)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_appears_in_its_skeleton() {
        for template in PromptTemplate::all() {
            for slot in template.slots() {
                assert!(
                    template.skeleton().contains(&format!("{{{slot}}}")),
                    "{} lacks {{{slot}}}",
                    template.id()
                );
            }
        }
    }

    #[test]
    fn test_fill_leaves_no_placeholders() {
        for template in PromptTemplate::all() {
            let values: Vec<(&str, &str)> =
                template.slots().iter().map(|s| (*s, "VALUE")).collect();
            let prompt = template.fill(&values).unwrap();
            for slot in template.slots() {
                assert!(!prompt.contains(&format!("{{{slot}}}")));
            }
            assert!(prompt.contains("VALUE"));
        }
    }

    #[test]
    fn test_fill_substitutes_in_place() {
        let prompt = PromptTemplate::AtsKeywords
            .fill(&[(SLOT_JOB_DESCRIPTION, "Rust engineer")])
            .unwrap();
        assert!(prompt.contains("Job Description:\nRust engineer\n\nTop 5 Technical Terms:"));
    }

    #[test]
    fn test_missing_slot_is_rejected() {
        let err = PromptTemplate::CoverLetterRewrite
            .fill(&[(SLOT_JOB_DESCRIPTION, "jd")])
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingSlot {
                template: "cover_letter_rewrite",
                slot: SLOT_COVER_LETTER,
            }
        );
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let err = PromptTemplate::AtsKeywords
            .fill(&[(SLOT_JOB_DESCRIPTION, "jd"), ("resume", "r")])
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownSlot { .. }));
    }

    #[test]
    fn test_user_text_with_placeholder_syntax_is_not_rescanned() {
        let prompt = PromptTemplate::FeedbackApplication
            .fill(&[
                (SLOT_MODIFIED_COVER_LETTER, "Dear team, {feedback} {x"),
                (SLOT_FEEDBACK, "More formal"),
            ])
            .unwrap();
        assert!(prompt.contains("Dear team, {feedback} {x"));
        assert!(prompt.contains("Feedback:\nMore formal"));
    }

    #[test]
    fn test_empty_value_is_allowed_when_supplied() {
        let prompt = PromptTemplate::VisaSponsorship
            .fill(&[(SLOT_JOB_DESCRIPTION, "")])
            .unwrap();
        assert!(prompt.contains("Job Description:\n\n"));
    }

    #[test]
    fn test_sponsorship_template_names_all_three_phrases() {
        let skeleton = PromptTemplate::VisaSponsorship.skeleton();
        for verdict in [
            SponsorshipVerdict::Offers,
            SponsorshipVerdict::DoesNotSponsor,
            SponsorshipVerdict::NoMention,
        ] {
            assert!(skeleton.contains(verdict.phrase()));
        }
    }

    #[test]
    fn test_classify_exact_phrases() {
        assert_eq!(
            SponsorshipVerdict::classify_text("This job offers visa sponsorship."),
            Some(SponsorshipVerdict::Offers)
        );
        assert_eq!(
            SponsorshipVerdict::classify_text("This job does not sponsor work visas."),
            Some(SponsorshipVerdict::DoesNotSponsor)
        );
        assert_eq!(
            SponsorshipVerdict::classify_text("No mention of sponsorship."),
            Some(SponsorshipVerdict::NoMention)
        );
    }

    #[test]
    fn test_classify_near_variants() {
        assert_eq!(
            SponsorshipVerdict::classify_text("  this job does not sponsor work visas  "),
            Some(SponsorshipVerdict::DoesNotSponsor)
        );
        assert_eq!(
            SponsorshipVerdict::classify_text("Answer: This job offers visa sponsorship"),
            Some(SponsorshipVerdict::Offers)
        );
        assert_eq!(SponsorshipVerdict::classify_text("Maybe?"), None);
    }

    #[test]
    fn test_template_ids_are_unique() {
        let mut ids: Vec<&str> = PromptTemplate::all().iter().map(|t| t.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
