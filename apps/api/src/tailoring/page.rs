//! The single HTML page. Rendered server-side with minijinja; `.html` templates are
//! autoescaped, so job descriptions and model output are safe to interpolate.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::errors::AppError;
use crate::tailoring::controller::GenerateReport;

pub const PAGE_TEMPLATE_NAME: &str = "index.html";

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Job Application Assistant</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; box-sizing: border-box; font: inherit; }
  button { margin-top: .5rem; padding: .4rem 1.2rem; }
  .letter, .analysis { white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }
  .error { color: #b00020; }
  .warning { color: #8a6d00; }
</style>
</head>
{%- macro notice(section) -%}
{%- if section.status == "failed" %}<p class="error">{{ section.message }}</p>
{%- elif section.status == "degraded" %}<p class="warning">{{ section.warning }}</p>
{%- endif -%}
{%- endmacro %}
<body>
<h1>Job Application Assistant</h1>
<p>Paste the job description below and generate the top 5 ATS keywords, a tailored cover letter, a visa sponsorship check and a skill gap analysis.</p>

<form method="post" action="/generate">
  <label for="job_description">Job Description</label>
  <textarea id="job_description" name="job_description" rows="15">{{ job_description }}</textarea>
  <button type="submit">Generate</button>
</form>
{% if generate_error %}<p class="error">{{ generate_error }}</p>{% endif %}

{% if report %}
<section id="keywords">
  <h2>Top 5 Technical Terms for ATS Match:</h2>
  {{ notice(report.keywords) }}
  {% if report.keywords.value %}
  <ol>{% for term in report.keywords.value %}<li>{{ term }}</li>{% endfor %}</ol>
  {% endif %}
</section>

<section id="cover-letter">
  <h2>Modified Cover Letter:</h2>
  {{ notice(report.cover_letter) }}
  {% if report.cover_letter.value %}<div class="letter">{{ report.cover_letter.value }}</div>{% endif %}
</section>

<section id="sponsorship">
  <h2>Visa Sponsorship Information:</h2>
  {{ notice(report.sponsorship) }}
  {% if report.sponsorship.value %}<p>{{ report.sponsorship.value.text }}</p>{% endif %}
</section>

<section id="skill-gap">
  <h2>Skill Gap Analysis:</h2>
  {{ notice(report.skill_gap) }}
  {% if report.skill_gap.value %}<div class="analysis">{{ report.skill_gap.value }}</div>{% endif %}
</section>
{% elif current_cover_letter and not updated_cover_letter %}
<section id="cover-letter">
  <h2>Current Cover Letter:</h2>
  <div class="letter">{{ current_cover_letter }}</div>
</section>
{% endif %}

{% if show_feedback %}
<section id="feedback">
  <h2>Provide Feedback for Further Modifications:</h2>
  <form method="post" action="/feedback">
    <label for="feedback">Feedback</label>
    <textarea id="feedback" name="feedback" rows="5">{{ feedback }}</textarea>
    <button type="submit">Apply Feedback</button>
  </form>
  {% if feedback_error %}<p class="error">{{ feedback_error }}</p>{% endif %}
  {% if updated_cover_letter %}
  <h2>Updated Cover Letter:</h2>
  <div class="letter">{{ updated_cover_letter }}</div>
  {% endif %}
</section>
{% endif %}
</body>
</html>
"#;

/// Everything the page template reads. Unset fields render nothing.
#[derive(Debug, Default, Serialize)]
pub struct PageView<'a> {
    pub job_description: &'a str,
    pub feedback: &'a str,
    pub report: Option<&'a GenerateReport>,
    pub current_cover_letter: Option<&'a str>,
    pub updated_cover_letter: Option<&'a str>,
    pub generate_error: Option<String>,
    pub feedback_error: Option<String>,
    pub show_feedback: bool,
}

pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
    Ok(env)
}

pub fn render(env: &Environment<'_>, view: &PageView<'_>) -> Result<String, AppError> {
    env.get_template(PAGE_TEMPLATE_NAME)
        .and_then(|template| template.render(view))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render page: {e}")))
}
