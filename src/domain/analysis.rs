//! Analysis result normalization.
//!
//! The analysis backend has gone through several response shapes (camelCase,
//! snake_case, and the older `plagiarism`/`ai` envelopes). Everything the
//! result panels read goes through [`normalize`], which maps any of them,
//! or nothing at all, onto one fully-defaulted [`DocumentAnalysis`].
//!
//! Field precedence:
//! - top-level fields and `textAnalysis`: camelCase, then snake_case, then the
//!   legacy envelope;
//! - `documentStats`: snake_case, then camelCase, then `0`.
//!
//! A value of the wrong type counts as absent, so a malformed preferred field
//! falls through to the next candidate.

use serde::Serialize;
use serde_json::{Map, Value};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// One completed analysis of one uploaded document, safe to render as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub plagiarism_score: f64,
    pub ai_score: f64,
    pub text_analysis: TextAnalysis,
    pub sources_detected: Vec<SourceMatch>,
    pub ai_markers: Vec<AiMarker>,
    pub document_stats: DocumentStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_text: Option<String>,
}

/// Alternate percentage breakdown reported by some backend versions.
///
/// Not guaranteed to agree with `plagiarism_score`/`ai_score`; it is carried
/// through for display but never used for derived figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub original_content: f64,
    pub plagiarized_content: f64,
    pub ai_generated_content: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMatch {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub match_percentage: f64,
    pub snippets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMarker {
    /// Detected model family, e.g. "GPT-4".
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub word_count: u64,
    pub character_count: u64,
    pub page_count: u64,
    /// Minutes.
    pub reading_time: f64,
}

/// Severity band used to pick a display style for an AI marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 85.0 {
            Self::High
        } else if confidence > 70.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl DocumentAnalysis {
    /// Share of the document that is neither plagiarized nor AI generated.
    ///
    /// Always `100 - plagiarism - ai`, clamped to `[0, 100]`, regardless of
    /// what `text_analysis.original_content` says.
    pub fn original_content_percentage(&self) -> f64 {
        (100.0 - self.plagiarism_score - self.ai_score).clamp(0.0, 100.0)
    }
}

impl AiMarker {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

/// Normalize a raw backend payload. `None` is the "no analysis yet" state.
///
/// Total: any input, including non-objects, yields a render-safe value.
pub fn normalize(raw: Option<&Value>) -> DocumentAnalysis {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return DocumentAnalysis::default();
    };

    let plagiarism = obj.get("plagiarism").and_then(Value::as_object);
    let ai = obj.get("ai").and_then(Value::as_object);

    let plagiarism_score = number_of(obj, &["plagiarismScore", "plagiarism_score"])
        .or_else(|| plagiarism.and_then(|p| number_of(p, &["score"])))
        .map(percentage)
        .unwrap_or(0.0);

    let ai_score = number_of(obj, &["aiScore", "ai_score"])
        .or_else(|| ai.and_then(|a| number_of(a, &["score"])))
        .map(percentage)
        .unwrap_or(0.0);

    let text_analysis = object_of(obj, &["textAnalysis", "text_analysis"])
        .map(normalize_text_analysis)
        .unwrap_or_default();

    let sources_detected = array_of(obj, &["sourcesDetected", "sources_detected"])
        .or_else(|| plagiarism.and_then(|p| array_of(p, &["matches"])))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(normalize_source)
                .collect()
        })
        .unwrap_or_default();

    // Index is the marker's position in the payload, so placeholder names stay
    // stable even when neighbouring entries are malformed.
    let ai_markers = array_of(obj, &["aiMarkers", "ai_markers"])
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| item.as_object().map(|m| normalize_marker(m, i)))
                .collect()
        })
        .unwrap_or_default();

    let document_stats = object_of(obj, &["documentStats", "document_stats", "stats"])
        .map(normalize_stats)
        .unwrap_or_default();

    DocumentAnalysis {
        plagiarism_score,
        ai_score,
        text_analysis,
        sources_detected,
        ai_markers,
        document_stats,
        file_url: text_of(obj, &["fileUrl", "file_url"]),
        content: text_of(obj, &["content"]),
        highlighted_text: text_of(obj, &["highlightedText", "highlighted_text"]),
    }
}

fn normalize_text_analysis(obj: &Map<String, Value>) -> TextAnalysis {
    let pct = |keys: &[&str]| number_of(obj, keys).map(percentage).unwrap_or(0.0);

    TextAnalysis {
        original_content: pct(&["originalContent", "original_content"]),
        plagiarized_content: pct(&["plagiarizedContent", "plagiarized_content"]),
        ai_generated_content: pct(&["aiGeneratedContent", "ai_generated_content"]),
    }
}

fn normalize_source(obj: &Map<String, Value>) -> SourceMatch {
    SourceMatch {
        source: text_of(obj, &["source"]).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        url: text_of(obj, &["url"]),
        match_percentage: number_of(obj, &["matchPercentage", "match_percentage", "similarity"])
            .map(percentage)
            .unwrap_or(0.0),
        snippets: strings_of(obj, &["snippets"]),
    }
}

fn normalize_marker(obj: &Map<String, Value>, index: usize) -> AiMarker {
    AiMarker {
        kind: text_of(obj, &["type"]).unwrap_or_else(|| format!("AI Marker {}", index + 1)),
        confidence: number_of(obj, &["confidence"])
            .map(percentage)
            .unwrap_or(0.0),
        sections: strings_of(obj, &["sections"]),
    }
}

fn normalize_stats(obj: &Map<String, Value>) -> DocumentStats {
    DocumentStats {
        word_count: number_of(obj, &["word_count", "wordCount"]).map(count).unwrap_or(0),
        character_count: number_of(obj, &["character_count", "characterCount"])
            .map(count)
            .unwrap_or(0),
        page_count: number_of(obj, &["page_count", "pageCount"]).map(count).unwrap_or(0),
        reading_time: number_of(obj, &["reading_time", "readingTime"])
            .map(|v| v.max(0.0))
            .unwrap_or(0.0),
    }
}

// ---------------------------------------------------------------------------
// Lenient accessors
// ---------------------------------------------------------------------------

/// First key whose value reads as a finite number. Numeric strings count.
fn number_of(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(as_number)
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// First key holding a non-blank string.
fn text_of(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn object_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(Value::as_object)
}

fn array_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(Value::as_array)
}

/// String elements only; anything else in the array is dropped.
fn strings_of(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    array_of(obj, keys)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn percentage(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

fn count(v: f64) -> u64 {
    // `as` saturates, and negatives are already floored to zero
    v.max(0.0).trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_finite(a: &DocumentAnalysis) -> bool {
        let t = &a.text_analysis;
        [
            a.plagiarism_score,
            a.ai_score,
            t.original_content,
            t.plagiarized_content,
            t.ai_generated_content,
            a.document_stats.reading_time,
            a.original_content_percentage(),
        ]
        .iter()
        .chain(a.sources_detected.iter().map(|s| &s.match_percentage))
        .chain(a.ai_markers.iter().map(|m| &m.confidence))
        .all(|v| v.is_finite())
    }

    #[test]
    fn missing_payload_equals_empty_object() {
        let none = normalize(None);
        let empty = normalize(Some(&json!({})));

        assert_eq!(none, empty);
        assert_eq!(none, DocumentAnalysis::default());
        assert_eq!(normalize(None), none);
        assert!(none.sources_detected.is_empty());
        assert!(none.ai_markers.is_empty());
        assert_eq!(none.document_stats, DocumentStats::default());
    }

    #[test]
    fn non_object_payloads_degrade_to_empty() {
        for raw in [json!(null), json!(42), json!("oops"), json!([1, 2, 3])] {
            assert_eq!(normalize(Some(&raw)), DocumentAnalysis::default(), "{raw}");
        }
    }

    #[test]
    fn malformed_fields_still_render_safely() {
        let raw = json!({
            "plagiarismScore": "not a number",
            "aiScore": null,
            "textAnalysis": [],
            "sourcesDetected": null,
            "aiMarkers": [null, 7, {"confidence": "high"}],
            "documentStats": {"wordCount": {}, "page_count": true},
        });

        let a = normalize(Some(&raw));

        assert!(all_finite(&a));
        assert_eq!(a.plagiarism_score, 0.0);
        assert_eq!(a.ai_score, 0.0);
        assert!(a.sources_detected.is_empty());
        assert_eq!(a.ai_markers.len(), 1);
        assert_eq!(a.ai_markers[0].kind, "AI Marker 3");
        assert_eq!(a.ai_markers[0].confidence, 0.0);
        assert!(a.ai_markers[0].sections.is_empty());
        assert_eq!(a.document_stats, DocumentStats::default());
    }

    #[test]
    fn stats_prefer_snake_case() {
        let both = normalize(Some(&json!({"documentStats": {"word_count": 5, "wordCount": 9}})));
        assert_eq!(both.document_stats.word_count, 5);

        let camel = normalize(Some(&json!({"documentStats": {"wordCount": 9}})));
        assert_eq!(camel.document_stats.word_count, 9);

        let neither = normalize(Some(&json!({"documentStats": {}})));
        assert_eq!(neither.document_stats.word_count, 0);
    }

    #[test]
    fn malformed_snake_case_stat_falls_back_to_camel_case() {
        let a = normalize(Some(&json!({
            "document_stats": {"reading_time": "soon", "readingTime": 17.5}
        })));
        assert_eq!(a.document_stats.reading_time, 17.5);
    }

    #[test]
    fn source_and_marker_placeholders() {
        let a = normalize(Some(&json!({
            "sourcesDetected": [{"url": "", "snippets": ["a", 3, "b"]}],
            "aiMarkers": [{"type": "GPT-4", "confidence": 87.2}, {"type": "  "}],
        })));

        let source = &a.sources_detected[0];
        assert_eq!(source.source, UNKNOWN_SOURCE);
        assert_eq!(source.url, None);
        assert_eq!(source.match_percentage, 0.0);
        assert_eq!(source.snippets, vec!["a".to_string(), "b".to_string()]);

        assert_eq!(a.ai_markers[0].kind, "GPT-4");
        assert_eq!(a.ai_markers[1].kind, "AI Marker 2");
    }

    #[test]
    fn legacy_envelope_is_understood() {
        let raw = json!({
            "plagiarism": {
                "score": 31.5,
                "matches": [{"source": "documents/old.pdf", "similarity": 31.5, "url": "/documents/4/"}]
            },
            "ai": {"score": 72.25, "is_generated": true},
            "highlighted_text": "some <mark class=\"highlight\">text</mark>",
            "document_stats": {"word_count": 120, "character_count": 700, "page_count": 1, "reading_time": 0.5}
        });

        let a = normalize(Some(&raw));

        assert_eq!(a.plagiarism_score, 31.5);
        assert_eq!(a.ai_score, 72.25);
        assert_eq!(a.sources_detected[0].match_percentage, 31.5);
        assert_eq!(a.sources_detected[0].source, "documents/old.pdf");
        assert_eq!(a.document_stats.character_count, 700);
        assert!(a.highlighted_text.is_some());
    }

    #[test]
    fn serializer_shape_with_string_decimals() {
        let raw = json!({
            "plagiarism_score": "12.50",
            "ai_score": 3,
            "text_analysis": {"original_content": 84.5, "plagiarized_content": 12.5, "ai_generated_content": 3},
            "stats": {"word_count": 10},
            "file_url": "http://localhost:8000/media/documents/essay.pdf"
        });

        let a = normalize(Some(&raw));

        assert_eq!(a.plagiarism_score, 12.5);
        assert_eq!(a.text_analysis.original_content, 84.5);
        assert_eq!(a.document_stats.word_count, 10);
        assert_eq!(
            a.file_url.as_deref(),
            Some("http://localhost:8000/media/documents/essay.pdf")
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let a = normalize(Some(&json!({
            "plagiarismScore": 140,
            "aiScore": -3,
            "documentStats": {"wordCount": -10, "pageCount": 2.9}
        })));

        assert_eq!(a.plagiarism_score, 100.0);
        assert_eq!(a.ai_score, 0.0);
        assert_eq!(a.document_stats.word_count, 0);
        assert_eq!(a.document_stats.page_count, 2);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(ConfidenceBand::from_confidence(90.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(75.0), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(50.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_confidence(85.0), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(70.0), ConfidenceBand::Low);
    }

    #[test]
    fn original_content_is_derived_from_scores() {
        let a = normalize(Some(&json!({
            "plagiarismScore": 18,
            "aiScore": 42,
            "textAnalysis": {"originalContent": 77}
        })));
        assert_eq!(a.original_content_percentage(), 40.0);

        let over = normalize(Some(&json!({"plagiarismScore": 60, "aiScore": 60})));
        assert_eq!(over.original_content_percentage(), 0.0);
    }

    #[test]
    fn normalizing_the_output_again_is_stable() {
        let raw = json!({
            "plagiarismScore": 18,
            "aiScore": 42,
            "sourcesDetected": [{"matchPercentage": 8.5}],
            "aiMarkers": [{"confidence": 87.2, "sections": ["Introduction"]}],
            "documentStats": {"word_count": 4285, "readingTime": 17}
        });

        let once = normalize(Some(&raw));
        let reserialized = serde_json::to_value(&once).unwrap();
        let twice = normalize(Some(&reserialized));

        assert_eq!(once, twice);
    }

    #[test]
    fn backend_result_for_uploaded_essay() {
        let raw = json!({
            "plagiarismScore": 18,
            "aiScore": 42,
            "sourcesDetected": [],
            "aiMarkers": [],
            "documentStats": {"word_count": 4285}
        });

        let a = normalize(Some(&raw));

        assert_eq!(a.document_stats.word_count, 4285);
        assert_eq!(a.document_stats.character_count, 0);
        assert_eq!(a.document_stats.page_count, 0);
        assert_eq!(a.document_stats.reading_time, 0.0);
        assert!(a.sources_detected.is_empty());
        assert!(a.ai_markers.is_empty());
        assert_eq!(a.original_content_percentage(), 40.0);
    }
}
