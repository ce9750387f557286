//! Static document assets — the base cover letter and the resume.
//!
//! Both are loaded once at startup. Built-in text is used unless a file path
//! override is configured.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Three paragraphs, one per line. Paragraph 2 is kept verbatim by every rewrite.
pub const COVER_LETTER: &str = "\
Builders FirstSource's commitment to transforming the future of home building resonates deeply with my passion for using data to drive impactful, business-centric solutions. The opportunity to join your Data Management & Stewardship Summer Internship program excites me, as it offers the chance to contribute directly to critical transformation initiatives within a leading company. As a full-stack and data visualization internship at Humana, I utilized Angular for the frontend and the .NET framework for the backend to improve code quality metrics by 20% and engineered optimized SQL database solutions that increased processing speeds by 35% for high-volume datasets.
Beyond software development, I have a strong interest in deep learning and have completed multiple projects in this field. For instance, I developed an age prediction tool using TensorFlow and a ResNet-9 CNN model, achieving 85% accuracy in estimating ages from group photos. I also led the creation of FraudGuardPro, a system for detecting fraudulent insurance claims using decision trees and random forests with Scikit-learn. Participating in various hackathons and collaborating with diverse teams has honed my ability to thrive in dynamic, fast-paced environments.
I am particularly excited about the opportunity to collaborate with seasoned professionals in a dynamic, growth-oriented environment. Builders FirstSource’s focus on continuous learning and innovation aligns perfectly with my career aspirations. I am confident that my strong analytical skills, coupled with my dedication to data-driven decision-making, will allow me to be an asset to your team.
";

pub const RESUME: &str = "\
EDUCATION
B.S. Computer Science, minor in Data Science (expected May 2026)
Relevant coursework: Data Structures, Algorithms, Database Systems, Machine Learning, Statistics

EXPERIENCE
Full-Stack & Data Visualization Intern, Humana (May 2024 - Aug 2024)
- Built Angular dashboards backed by .NET Web API services, improving code quality metrics by 20%
- Optimized SQL Server queries and indexes, increasing processing speed by 35% on high-volume datasets
- Wrote unit tests with xUnit and Jasmine; shipped through Azure DevOps CI pipelines

PROJECTS
Age Prediction from Group Photos - Python, TensorFlow, OpenCV
- Trained a ResNet-9 CNN reaching 85% accuracy estimating ages of faces in group photos
FraudGuardPro - Python, Scikit-learn, Pandas
- Led a team of four building decision-tree and random-forest models to flag fraudulent insurance claims

SKILLS
Languages: Python, C#, TypeScript, JavaScript, SQL, Java
Frameworks & Libraries: Angular, .NET, TensorFlow, Scikit-learn, Pandas, NumPy
Tools: Git, Azure DevOps, Jupyter, Tableau, Power BI
";

/// The document pair every session works from. Never mutated after startup.
#[derive(Debug, Clone)]
pub struct Documents {
    pub cover_letter: String,
    pub resume: String,
}

impl Default for Documents {
    fn default() -> Self {
        Self {
            cover_letter: COVER_LETTER.to_string(),
            resume: RESUME.to_string(),
        }
    }
}

impl Documents {
    /// Loads the built-in documents, replacing either one with a file's contents when
    /// a path is given. Unreadable or blank files are an error.
    pub fn load(cover_letter_path: Option<&Path>, resume_path: Option<&Path>) -> Result<Self> {
        let mut docs = Documents::default();

        if let Some(path) = cover_letter_path {
            docs.cover_letter = read_document(path, "cover letter")?;
        }
        if let Some(path) = resume_path {
            docs.resume = read_document(path, "resume")?;
        }

        info!(
            "Documents loaded: cover letter {} paragraphs, resume {} bytes",
            paragraphs(&docs.cover_letter).len(),
            docs.resume.len()
        );

        Ok(docs)
    }
}

fn read_document(path: &Path, label: &str) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {label} from {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("{label} file {} is empty", path.display());
    }
    Ok(text)
}

/// Splits a letter into trimmed, non-empty paragraphs. Paragraphs are separated by
/// line breaks; blank lines between them are ignored.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
