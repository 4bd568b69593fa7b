//! Job page scraping: fetch the HTML, keep the visible text, cap its length.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html};
use tracing::info;

/// Upper bound on the characters handed to the model.
pub const MAX_CHARS: usize = 6000;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Elements whose whole subtree is dropped before text extraction.
const STRIP_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "noscript", "svg", "img", "iframe", "form",
];

/// Builds the HTTP client used for job pages: browser-like user agent,
/// redirects followed, fixed timeout.
pub fn build_http_client() -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// Fetches `url` and returns its cleaned, truncated text.
/// Non-2xx responses are errors.
pub async fn scrape_job(client: &Client, url: &str) -> reqwest::Result<String> {
    info!("Scraping job page: {url}");

    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let text = truncate(&clean_html(&html), MAX_CHARS);
    info!("Scraped {} chars from {url}", text.chars().count());
    Ok(text)
}

/// Visible text of `html`, one trimmed non-blank line per text fragment.
pub fn clean_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_text(document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    if STRIP_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, lines);
        } else if let Some(text) = child.value().as_text() {
            lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from),
            );
        }
    }
}

/// Cuts `text` to at most `max_chars` characters, backing up to the last
/// newline inside the limit so no line is split. A prefix without any
/// newline is cut hard.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let Some((limit, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..limit];
    let cut = head.rsplit_once('\n').map_or(head, |(kept, _)| kept);
    info!(
        "Truncated scraped text from {} to {} chars",
        text.chars().count(),
        cut.chars().count()
    );
    cut.to_string()
}
