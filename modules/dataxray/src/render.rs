//! Presentation of controller state as an HTML fragment or terminal text.
//!
//! Provider text is untrusted: it is escaped (HTML) or stripped of control
//! characters (terminal) before any markup is applied.

use std::sync::LazyLock;

use ai_client::WebSource;
use console::style;
use regex::{Captures, Regex};

use crate::controller::{Phase, UiState};

static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid")
});

const NO_SUMMARY_AVAILABLE: &str = "No summary available.";
const EMPTY_RESULTS_TITLE: &str = "No direct datasets found.";
const EMPTY_RESULTS_HINT: &str = "Try using the Optimize action to refine your query.";

// =============================================================================
// Source classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    GitHub,
    Kaggle,
    Spreadsheet,
    Generic,
}

impl SourceKind {
    pub fn classify(uri: &str) -> Self {
        if uri.contains("github.com") {
            SourceKind::GitHub
        } else if uri.contains("kaggle.com") {
            SourceKind::Kaggle
        } else if uri.contains("csv") || uri.contains("xls") {
            SourceKind::Spreadsheet
        } else {
            SourceKind::Generic
        }
    }

    fn tag(self) -> &'static str {
        match self {
            SourceKind::GitHub => "github",
            SourceKind::Kaggle => "kaggle",
            SourceKind::Spreadsheet => "sheet",
            SourceKind::Generic => "data",
        }
    }
}

/// Hostname without a leading `www.`, or `Web Source` when unparseable.
pub fn source_label(uri: &str) -> String {
    url::Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "Web Source".to_string())
}

fn display_title(source: &WebSource) -> &str {
    if source.title.trim().is_empty() {
        &source.uri
    } else {
        &source.title
    }
}

// =============================================================================
// HTML
// =============================================================================

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `**text**` becomes `<strong>`, newlines become `<br />`.
pub fn summary_html(summary: &str) -> String {
    if summary.is_empty() {
        return format!(r#"<p class="empty">{NO_SUMMARY_AVAILABLE}</p>"#);
    }
    let escaped = html_escape(summary);
    BOLD.replace_all(&escaped, "<strong>$1</strong>")
        .replace('\n', "<br />")
}

fn card_html(source: &WebSource) -> String {
    format!(
        r#"<a class="dataset-card {kind}" href="{href}" target="_blank" rel="noopener noreferrer">
    <span class="source-label">{label}</span>
    <h3>{title}</h3>
    <div class="uri">{uri}</div>
</a>"#,
        kind = SourceKind::classify(&source.uri).tag(),
        href = html_escape(&source.uri),
        label = html_escape(&source_label(&source.uri)),
        title = html_escape(display_title(source)),
        uri = html_escape(&source.uri),
    )
}

/// Render the results area for the current state.
pub fn results_html(state: &UiState) -> String {
    match state.phase() {
        Phase::Idle => String::new(),
        Phase::Searching => format!(
            r#"<p class="loading">Scanning repositories for '{}'...</p>"#,
            html_escape(&state.query)
        ),
        Phase::Failed => format!(
            r#"<div class="error">{}</div>"#,
            html_escape(state.error.as_deref().unwrap_or_default())
        ),
        Phase::Displaying => {
            let count = state.result_count();
            let cards = if count == 0 {
                format!(
                    r#"<div class="empty-results"><p>{EMPTY_RESULTS_TITLE}</p><p>{EMPTY_RESULTS_HINT}</p></div>"#
                )
            } else {
                state
                    .visible_results()
                    .map(card_html)
                    .collect::<Vec<_>>()
                    .join("\n")
            };

            format!(
                r#"<section class="summary">
<h3>AI Analysis</h3>
<div class="markdown-content">{summary}</div>
<footer><span>Focus: {focus}</span><span>{count} results</span></footer>
</section>
<section class="datasets">
<h3>Discovered Datasets</h3>
{cards}
</section>"#,
                summary = summary_html(&state.summary),
                focus = html_escape(state.selected_platform.name()),
            )
        }
    }
}

// =============================================================================
// Terminal
// =============================================================================

fn strip_control(s: &str) -> String {
    s.chars().filter(|c| *c == '\n' || !c.is_control()).collect()
}

pub fn summary_terminal(summary: &str) -> String {
    if summary.is_empty() {
        return style(NO_SUMMARY_AVAILABLE).italic().dim().to_string();
    }
    let clean = strip_control(summary);
    BOLD.replace_all(&clean, |caps: &Captures| style(&caps[1]).bold().to_string())
        .into_owned()
}

pub fn results_terminal(state: &UiState) -> String {
    match state.phase() {
        Phase::Idle => String::new(),
        Phase::Searching => format!(
            "Scanning repositories for '{}'...",
            strip_control(&state.query)
        ),
        Phase::Failed => style(state.error.as_deref().unwrap_or_default())
            .red()
            .bold()
            .to_string(),
        Phase::Displaying => {
            let mut out = String::new();
            out.push_str(&format!("{}\n", style("AI Analysis").bold().cyan()));
            out.push_str(&summary_terminal(&state.summary));
            out.push_str(&format!(
                "\n\n{}  {} results\n\n",
                style(format!("Focus: {}", state.selected_platform.name())).dim(),
                state.result_count()
            ));

            if state.result_count() == 0 {
                out.push_str(&format!("{}\n{}\n", EMPTY_RESULTS_TITLE, style(EMPTY_RESULTS_HINT).dim()));
                return out;
            }

            out.push_str(&format!("{}\n", style("Discovered Datasets").bold().cyan()));
            for (i, source) in state.visible_results().enumerate() {
                out.push_str(&format!(
                    "{:>3}. [{}] {}\n     {}\n     {}\n",
                    i + 1,
                    SourceKind::classify(&source.uri).tag(),
                    style(strip_control(display_title(source))).bold(),
                    style(source_label(&source.uri)).dim(),
                    strip_control(&source.uri),
                ));
            }
            out
        }
    }
}
