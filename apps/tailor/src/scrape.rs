//! Best-effort job posting extraction from a captured job page.
//!
//! Each field has an ordered list of CSS selectors; the first element with
//! non-empty text wins. Nothing here fails: a field that cannot be found
//! becomes `"N/A"` and the caller carries on.

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, warn};

pub const NOT_AVAILABLE: &str = "N/A";
/// Descriptions shorter than this are reported as insufficient.
const MIN_DESCRIPTION_CHARS: usize = 50;
const JOB_PAGE_MARKER: &str = "linkedin.com/jobs/";

const TITLE_SELECTORS: &[&str] = &[
    ".jobs-unified-top-card__job-title",
    ".job-details-jobs-unified-top-card__job-title",
    "h1",
];

const COMPANY_SELECTORS: &[&str] = &[
    ".jobs-unified-top-card__company-name a",
    ".jobs-unified-top-card__company-name",
    ".job-details-jobs-unified-top-card__company-name a",
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".jobs-description-content__text .jobs-box__html-content",
    ".jobs-description-content__text",
    ".jobs-description__container",
    ".job-details-jobs-unified-top-card__job-description",
    "#job-details",
    ".jobs-search__job-details--container .jobs-description",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedJob {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    /// Title, company and description combined into the completion input.
    pub full_job_context: String,
    /// Non-fatal extraction problems, for display next to the result.
    pub warnings: Vec<String>,
}

impl ScrapedJob {
    pub fn description_found(&self) -> bool {
        self.job_description != NOT_AVAILABLE
    }
}

/// True when `url` points at a job posting page.
pub fn is_job_posting_url(url: &str) -> bool {
    url.contains(JOB_PAGE_MARKER)
}

pub fn scrape_job_page(html: &str) -> ScrapedJob {
    let document = Html::parse_document(html);

    let job_title = first_text(&document, TITLE_SELECTORS);
    let company_name = first_text(&document, COMPANY_SELECTORS);
    let job_description = first_text(&document, DESCRIPTION_SELECTORS);

    let mut warnings = Vec::new();
    if job_title.is_none() {
        warnings.push("Couldn't find the job title.".to_string());
    }
    if company_name.is_none() {
        warnings.push("Couldn't find the company name.".to_string());
    }
    match &job_description {
        None => warnings.push("Couldn't get description.".to_string()),
        Some(d) if d.chars().count() < MIN_DESCRIPTION_CHARS => {
            warn!(chars = d.len(), "Scraper: description insufficient");
            warnings.push("Description looks incomplete.".to_string());
        }
        Some(_) => {}
    }

    let job_title = job_title.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let company_name = company_name.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let job_description = job_description.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    debug!(
        title = %job_title,
        company = %company_name,
        desc_chars = job_description.len(),
        "Scraped job page"
    );

    let full_job_context =
        format!("Job Title: {job_title}\nCompany: {company_name}\n\n{job_description}");

    ScrapedJob {
        job_title,
        company_name,
        job_description,
        full_job_context,
        warnings,
    }
}

/// Tries each selector in order and returns the first non-empty element text.
fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = match Selector::parse(css) {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid selector {css}: {e:?}");
                return None;
            }
        };
        document
            .select(&selector)
            .map(|el| normalize_text(&el.text().collect::<String>()))
            .find(|t| !t.is_empty())
    })
}

/// Trims every line and drops empty ones.
fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1 class="job-details-jobs-unified-top-card__job-title"> Senior <b>Rust</b> Engineer </h1>
          <div class="jobs-unified-top-card__company-name"><a href="/c/acme">Acme, Inc.</a></div>
          <div class="jobs-description-content__text">
            <div class="jobs-box__html-content">
              <p>We are building a distributed storage engine.</p>
              <p>You will own the replication layer and its test harness.</p>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_scrape_full_page() {
        let job = scrape_job_page(PAGE);
        assert_eq!(job.job_title, "Senior Rust Engineer");
        assert_eq!(job.company_name, "Acme, Inc.");
        assert!(job.job_description.starts_with("We are building"));
        assert!(job.job_description.contains("\nYou will own"));
        assert!(job.warnings.is_empty(), "unexpected warnings {:?}", job.warnings);
        assert!(job
            .full_job_context
            .starts_with("Job Title: Senior Rust Engineer\nCompany: Acme, Inc.\n\nWe are"));
    }

    #[test]
    fn test_falls_back_to_later_selector() {
        let html = "<html><body><h1>Platform Engineer</h1></body></html>";
        let job = scrape_job_page(html);
        assert_eq!(job.job_title, "Platform Engineer");
    }

    #[test]
    fn test_empty_match_is_skipped() {
        let html = r#"<div class="jobs-unified-top-card__job-title">  </div><h1>Data Engineer</h1>"#;
        assert_eq!(scrape_job_page(html).job_title, "Data Engineer");
    }

    #[test]
    fn test_missing_fields_become_placeholders() {
        let job = scrape_job_page("<html><body><p>nothing here</p></body></html>");
        assert_eq!(job.job_title, NOT_AVAILABLE);
        assert_eq!(job.company_name, NOT_AVAILABLE);
        assert!(!job.description_found());
        assert_eq!(job.warnings.len(), 3);
        assert_eq!(job.full_job_context, "Job Title: N/A\nCompany: N/A\n\nN/A");
    }

    #[test]
    fn test_short_description_is_warned_not_dropped() {
        let html = r#"<div id="job-details">Write Rust.</div>"#;
        let job = scrape_job_page(html);
        assert_eq!(job.job_description, "Write Rust.");
        assert!(job.warnings.iter().any(|w| w.contains("incomplete")));
    }

    #[test]
    fn test_job_posting_url() {
        assert!(is_job_posting_url("https://www.linkedin.com/jobs/view/123"));
        assert!(!is_job_posting_url("https://www.linkedin.com/feed/"));
    }
}
