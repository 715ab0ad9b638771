//! Rendering contract for the result panels.
//!
//! Everything the statistics and document tabs display is derived here from a
//! normalized [`DocumentAnalysis`], so clients only lay it out.

use serde::Serialize;

use super::analysis::{ConfidenceBand, DocumentAnalysis, DocumentStats};
use super::preview::DocumentPreview;

/// Sections shown per AI marker before collapsing into "+ N more sections".
const VISIBLE_MARKER_SECTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    /// 1-based position in the list.
    pub index: usize,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub match_label: String,
    pub snippets: Vec<String>,
    pub has_snippets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerItem {
    pub label: String,
    pub confidence_label: String,
    pub band: ConfidenceBand,
    pub visible_sections: Vec<String>,
    pub hidden_section_count: usize,
}

/// Preview settings that depend on deployment, not on the analysis.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub office_viewer_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub analysis: DocumentAnalysis,
    pub original_content: f64,
    pub summary: Vec<StatCard>,
    pub content_distribution: Vec<ChartPoint>,
    pub risk_scores: Vec<ChartPoint>,
    pub plagiarism_chart: Vec<ChartPoint>,
    pub ai_content_chart: Vec<ChartPoint>,
    pub document_stats: Vec<StatCard>,
    pub sources: Vec<SourceItem>,
    pub ai_markers: Vec<MarkerItem>,
    pub empty_sources: bool,
    pub empty_markers: bool,
    pub preview: DocumentPreview,
}

impl AnalysisView {
    pub fn build(analysis: DocumentAnalysis, options: &PreviewOptions) -> Self {
        let original = analysis.original_content_percentage();
        let plagiarism = analysis.plagiarism_score;
        let ai = analysis.ai_score;

        let summary = vec![
            StatCard {
                title: "Original Content",
                value: format_percent(original),
                description: "Unique content percentage",
            },
            StatCard {
                title: "Plagiarized Content",
                value: format_percent(plagiarism),
                description: "Matched with existing sources",
            },
            StatCard {
                title: "AI Generated",
                value: format_percent(ai),
                description: "Probability of AI generation",
            },
        ];

        let content_distribution = vec![
            ChartPoint { name: "Original", value: original },
            ChartPoint { name: "Plagiarized", value: plagiarism },
            ChartPoint { name: "AI Generated", value: ai },
        ];

        let risk_scores = vec![
            ChartPoint { name: "Plagiarism", value: plagiarism },
            ChartPoint { name: "AI", value: ai },
        ];

        let plagiarism_chart = vec![
            ChartPoint { name: "Original", value: original },
            ChartPoint { name: "Plagiarized", value: plagiarism },
        ];

        let ai_content_chart = vec![
            ChartPoint { name: "AI Content", value: ai },
            ChartPoint { name: "Human Content", value: 100.0 - ai },
        ];

        let sources: Vec<SourceItem> = analysis
            .sources_detected
            .iter()
            .enumerate()
            .map(|(i, s)| SourceItem {
                index: i + 1,
                source: s.source.clone(),
                url: s.url.clone(),
                match_label: format!("{}% Match", trim_number(s.match_percentage)),
                snippets: s
                    .snippets
                    .iter()
                    .map(|snippet| or_placeholder(snippet, "No text available"))
                    .collect(),
                has_snippets: !s.snippets.is_empty(),
            })
            .collect();

        let ai_markers: Vec<MarkerItem> = analysis
            .ai_markers
            .iter()
            .map(|m| MarkerItem {
                label: m.kind.clone(),
                confidence_label: format!("{}% Confidence", trim_number(m.confidence)),
                band: m.band(),
                visible_sections: m
                    .sections
                    .iter()
                    .take(VISIBLE_MARKER_SECTIONS)
                    .map(|section| or_placeholder(section, "No content"))
                    .collect(),
                hidden_section_count: m.sections.len().saturating_sub(VISIBLE_MARKER_SECTIONS),
            })
            .collect();

        let preview = DocumentPreview::select(analysis.file_url.as_deref(), &options.office_viewer_url);

        Self {
            original_content: original,
            summary,
            content_distribution,
            risk_scores,
            plagiarism_chart,
            ai_content_chart,
            document_stats: stat_cards(&analysis.document_stats),
            empty_sources: sources.is_empty(),
            empty_markers: ai_markers.is_empty(),
            sources,
            ai_markers,
            preview,
            analysis,
        }
    }
}

fn stat_cards(stats: &DocumentStats) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Word Count",
            value: group_thousands(stats.word_count),
            description: "Total words in document",
        },
        StatCard {
            title: "Characters",
            value: group_thousands(stats.character_count),
            description: "Including spaces",
        },
        StatCard {
            title: "Pages",
            value: stats.page_count.to_string(),
            description: "Approximate count",
        },
        StatCard {
            title: "Reading Time",
            value: format!("{}m", trim_number(stats.reading_time)),
            description: "Average reading time",
        },
    ]
}

fn format_percent(v: f64) -> String {
    format!("{v:.2}%")
}

/// `8.5` -> "8.5", `12.0` -> "12"
fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn or_placeholder(s: &str, placeholder: &str) -> String {
    if s.trim().is_empty() {
        placeholder.to_string()
    } else {
        s.to_string()
    }
}
