//! Search request and outcome models

use crate::config::SearchSettings;
use crate::results::NormalizedResult;
use serde::{Deserialize, Serialize};

/// Query expansion condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryExpansionCondition {
    #[serde(rename = "CONDITION_UNSPECIFIED", alias = "unspecified")]
    Unspecified,
    #[serde(rename = "DISABLED", alias = "disabled")]
    Disabled,
    #[default]
    #[serde(rename = "AUTO", alias = "auto")]
    Auto,
}

/// Spell correction mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellCorrectionMode {
    #[serde(rename = "MODE_UNSPECIFIED", alias = "unspecified")]
    Unspecified,
    #[serde(rename = "SUGGESTION_ONLY", alias = "suggestion_only")]
    SuggestionOnly,
    #[default]
    #[serde(rename = "AUTO", alias = "auto")]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetSpec {
    pub return_snippet: bool,
}

/// Options for the generated summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySpec {
    pub summary_result_count: u32,
    pub include_citations: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore_adversarial_query: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore_non_summary_seeking_query: bool,
}

impl SummarySpec {
    pub fn new(summary_result_count: u32, include_citations: bool) -> Self {
        Self {
            summary_result_count,
            include_citations,
            ignore_adversarial_query: false,
            ignore_non_summary_seeking_query: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchSpec {
    pub snippet_spec: SnippetSpec,
    pub summary_spec: SummarySpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExpansionSpec {
    pub condition: QueryExpansionCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellCorrectionSpec {
    pub mode: SpellCorrectionMode,
}

/// Single-shot search request, serialized as the provider's JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub page_size: u32,
    pub content_search_spec: ContentSearchSpec,
    pub query_expansion_spec: QueryExpansionSpec,
    pub spell_correction_spec: SpellCorrectionSpec,
}

impl SearchRequest {
    /// Build a request for `query` with the configured content search options
    pub fn from_settings(query: impl Into<String>, settings: &SearchSettings) -> Self {
        Self {
            query: query.into(),
            page_size: settings.page_size.max(1),
            content_search_spec: ContentSearchSpec {
                snippet_spec: SnippetSpec {
                    return_snippet: settings.return_snippet,
                },
                summary_spec: SummarySpec {
                    summary_result_count: settings.summary_result_count,
                    include_citations: settings.include_citations,
                    ignore_adversarial_query: settings.ignore_adversarial_query,
                    ignore_non_summary_seeking_query: settings.ignore_non_summary_seeking_query,
                },
            },
            query_expansion_spec: QueryExpansionSpec {
                condition: settings.query_expansion,
            },
            spell_correction_spec: SpellCorrectionSpec {
                mode: settings.spell_correction,
            },
        }
    }
}

/// Normalized results and summary of one single-shot search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<NormalizedResult>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = SearchRequest::from_settings("apa itu sisa kuota", &SearchSettings::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "query": "apa itu sisa kuota",
                "pageSize": 10,
                "contentSearchSpec": {
                    "snippetSpec": {"returnSnippet": true},
                    "summarySpec": {
                        "summaryResultCount": 5,
                        "includeCitations": true,
                        "ignoreAdversarialQuery": true,
                        "ignoreNonSummarySeekingQuery": true
                    }
                },
                "queryExpansionSpec": {"condition": "AUTO"},
                "spellCorrectionSpec": {"mode": "AUTO"}
            })
        );
    }

    #[test]
    fn test_summary_spec_omits_unset_filters() {
        let value = serde_json::to_value(SummarySpec::new(3, true)).unwrap();
        assert_eq!(value, json!({"summaryResultCount": 3, "includeCitations": true}));
    }

    #[test]
    fn test_page_size_floor() {
        let settings = SearchSettings {
            page_size: 0,
            ..Default::default()
        };
        let request = SearchRequest::from_settings("q", &settings);
        assert_eq!(request.page_size, 1);
    }
}
