//! AI advisory service.
//!
//! External model calls that suggest complaint metadata. Output is never
//! authoritative: every suggestion passes a confidence/match gate before
//! auto-application, and any upstream failure degrades to "no suggestion"
//! rather than an error surfaced to the citizen.

use async_trait::async_trait;
use base64::Engine;
use echocity_common::{AppError, AppResult, config::AdvisoryConfig};
use echocity_db::entities::category;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence assigned when the category had to be scraped out of
/// unstructured model output instead of parsed JSON.
const LEXICAL_FALLBACK_CONFIDENCE: f64 = 0.6;

/// Confidence of the generic fallback suggestion.
const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.5;

/// Confidence assigned to delimited image analysis output.
const IMAGE_ANALYSIS_CONFIDENCE: f64 = 0.85;

/// Minimum confidence for auto-applying a suggested category.
const AUTO_APPLY_THRESHOLD: f64 = 0.7;

static CATEGORY_SCRAPE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)category['":\s]*([^'",\n]+)"#).ok());

/// A suggested category for a complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    /// Suggested category name.
    pub category: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    /// Optional model reasoning, surfaced to the user as a hint.
    pub reasoning: Option<String>,
}

/// Structured analysis of an uploaded complaint photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Suggested complaint title.
    pub title: String,
    /// Suggested complaint description.
    pub description: String,
    /// Suggested category name.
    pub category: String,
    /// Additional observed details.
    pub details: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// Result of the optional local analysis webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlAnalysis {
    /// Short label for the detected issue.
    pub label: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Client for the external advisory model.
///
/// Abstracted so tests can inject a canned double and so the webhook
/// analyzer can be swapped independently of the text model.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    /// Send a text prompt and return the raw model output.
    async fn generate_text(&self, prompt: &str) -> AppResult<String>;

    /// Send an image (base64) with a prompt and return the raw model output.
    async fn analyze_image(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> AppResult<String>;

    /// Ask the local analysis webhook about an already-uploaded image URL.
    async fn analyze_url(&self, image_url: &str) -> AppResult<UrlAnalysis>;
}

/// Gemini-backed advisory client.
#[derive(Clone)]
pub struct GeminiClient {
    config: AdvisoryConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    parts: Option<Vec<GeminiCandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client.
    #[must_use]
    pub fn new(config: AdvisoryConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            config,
            http_client,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalService("Advisory API key not configured".to_string()))
    }

    async fn generate(&self, request: &GeminiRequest) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base,
            self.config.model,
            self.api_key()?
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Advisory request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Advisory request returned {}",
                response.status()
            )));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid advisory response: {e}")))?;

        body.candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| p.drain(..).next())
            .and_then(|p| p.text)
            .ok_or_else(|| AppError::ExternalService("Empty advisory response".to_string()))
    }
}

#[async_trait]
impl AdvisoryClient for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> AppResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart::Text {
                    text: prompt.to_string(),
                }],
            }],
        };

        self.generate(&request).await
    }

    async fn analyze_image(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> AppResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: mime_type.to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                ],
            }],
        };

        self.generate(&request).await
    }

    async fn analyze_url(&self, image_url: &str) -> AppResult<UrlAnalysis> {
        let webhook_url = self.config.analyze_webhook_url.as_deref().ok_or_else(|| {
            AppError::ExternalService("Analysis webhook not configured".to_string())
        })?;

        let response = self
            .http_client
            .post(webhook_url)
            .json(&serde_json::json!({ "image_url": image_url }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Analysis webhook failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Analysis webhook returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid webhook response: {e}")))
    }
}

/// Advisory service over an injected client.
#[derive(Clone)]
pub struct AdvisoryService {
    client: std::sync::Arc<dyn AdvisoryClient>,
}

impl AdvisoryService {
    /// Create a new advisory service.
    #[must_use]
    pub fn new(client: std::sync::Arc<dyn AdvisoryClient>) -> Self {
        Self { client }
    }

    /// Suggest a category for free-text complaint content.
    ///
    /// Returns `None` when the model is unreachable; parse failures
    /// degrade through lexical scraping down to a generic suggestion.
    pub async fn suggest_category(
        &self,
        text: &str,
        category_names: &[String],
    ) -> Option<CategorySuggestion> {
        let prompt = format!(
            "Classify this civic complaint into exactly one of the following categories: {}.\n\
             Respond with JSON only: {{\"category\": \"...\", \"confidence\": 0.0, \"reasoning\": \"...\"}}\n\n\
             Complaint: {text}",
            category_names.join(", ")
        );

        match self.client.generate_text(&prompt).await {
            Ok(raw) => Some(parse_category_suggestion(&raw)),
            Err(e) => {
                warn!(error = %e, "Category suggestion unavailable");
                None
            }
        }
    }

    /// Analyze an uploaded photo and suggest complaint fields.
    pub async fn analyze_image(&self, image_bytes: &[u8], mime_type: &str) -> Option<ImageAnalysis> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let prompt = "Analyze this photo of a civic issue. Respond in this exact format:\n\
                      TITLE: <short title>\n\
                      DESCRIPTION: <one paragraph description>\n\
                      CATEGORY: <single category name>\n\
                      DETAILS: <bullet points of notable details>";

        match self.client.analyze_image(&encoded, mime_type, prompt).await {
            Ok(raw) => Some(parse_image_analysis(&raw)),
            Err(e) => {
                warn!(error = %e, "Image analysis unavailable");
                None
            }
        }
    }

    /// Ask the local webhook about an already-uploaded image.
    pub async fn analyze_by_url(&self, image_url: &str) -> Option<UrlAnalysis> {
        match self.client.analyze_url(image_url).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                debug!(error = %e, "URL analysis unavailable");
                None
            }
        }
    }

    /// Rewrite a complaint description for clarity.
    ///
    /// Returns the original text untouched when the model is unavailable.
    pub async fn enhance_description(&self, text: &str) -> String {
        let prompt = format!(
            "Rewrite this civic complaint description to be clear and factual. \
             Keep it under 120 words and do not invent details:\n\n{text}"
        );

        match self.client.generate_text(&prompt).await {
            Ok(enhanced) if !enhanced.trim().is_empty() => enhanced.trim().to_string(),
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!(error = %e, "Description enhancement unavailable");
                text.to_string()
            }
        }
    }
}

/// Pick the category to auto-apply for a suggestion, if any.
///
/// Auto-apply requires confidence strictly above the threshold AND a
/// lexical match (case-insensitive containment, either direction) with
/// an existing category name. Anything weaker stays a manual hint.
#[must_use]
pub fn select_category<'a>(
    suggestion: &CategorySuggestion,
    categories: &'a [category::Model],
) -> Option<&'a category::Model> {
    if suggestion.confidence <= AUTO_APPLY_THRESHOLD {
        return None;
    }

    categories
        .iter()
        .find(|c| names_match(&suggestion.category, &c.name))
}

fn names_match(suggested: &str, existing: &str) -> bool {
    let suggested = suggested.trim().to_lowercase();
    let existing = existing.trim().to_lowercase();
    if suggested.is_empty() || existing.is_empty() {
        return false;
    }
    suggested.contains(&existing) || existing.contains(&suggested)
}

/// Parse a category suggestion out of raw model output.
#[must_use]
pub fn parse_category_suggestion(raw: &str) -> CategorySuggestion {
    let cleaned = strip_code_fences(raw);

    #[derive(Deserialize)]
    struct Parsed {
        category: String,
        confidence: Option<f64>,
        reasoning: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<Parsed>(cleaned) {
        return CategorySuggestion {
            category: parsed.category.trim().to_string(),
            confidence: parsed.confidence.unwrap_or(LEXICAL_FALLBACK_CONFIDENCE).clamp(0.0, 1.0),
            reasoning: parsed.reasoning,
        };
    }

    // Model ignored the JSON instruction; scrape the category mention.
    if let Some(re) = CATEGORY_SCRAPE_RE.as_ref()
        && let Some(caps) = re.captures(cleaned)
        && let Some(m) = caps.get(1)
    {
        let name = m.as_str().trim().trim_matches(['\'', '"', '}', '{']).trim();
        if !name.is_empty() {
            return CategorySuggestion {
                category: name.to_string(),
                confidence: LEXICAL_FALLBACK_CONFIDENCE,
                reasoning: None,
            };
        }
    }

    CategorySuggestion {
        category: "Other".to_string(),
        confidence: DEFAULT_FALLBACK_CONFIDENCE,
        reasoning: None,
    }
}

/// Parse delimited image analysis output.
///
/// Expects `TITLE:` / `DESCRIPTION:` / `CATEGORY:` / `DETAILS:` lines;
/// bullet and continuation lines are folded into the last open section.
/// Free text without delimiters falls back to first-line-as-title.
#[must_use]
pub fn parse_image_analysis(raw: &str) -> ImageAnalysis {
    #[derive(PartialEq, Eq)]
    enum Section {
        None,
        Description,
        Details,
    }

    let mut title = String::new();
    let mut description = String::new();
    let mut category = String::new();
    let mut details = String::new();
    let mut current = Section::None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(trimmed, "TITLE:") {
            title = rest.to_string();
            current = Section::None;
        } else if let Some(rest) = strip_label(trimmed, "DESCRIPTION:") {
            description = rest.to_string();
            current = Section::Description;
        } else if let Some(rest) = strip_label(trimmed, "CATEGORY:") {
            category = rest.to_string();
            current = Section::None;
        } else if let Some(rest) = strip_label(trimmed, "DETAILS:") {
            details = rest.to_string();
            current = Section::Details;
        } else if current != Section::None {
            let fragment = trimmed.trim_start_matches(['-', '*', '•']).trim();
            if !fragment.is_empty() {
                let section = match current {
                    Section::Description => &mut description,
                    _ => &mut details,
                };
                if !section.is_empty() {
                    section.push(' ');
                }
                section.push_str(fragment);
            }
        }
    }

    // No delimiters at all: treat the whole response as free text.
    if title.is_empty() {
        let first_line = raw.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
        title = truncate(first_line, 80);
        if description.is_empty() {
            description = raw.trim().to_string();
        }
    }

    if category.is_empty() {
        category = "Other".to_string();
    }

    ImageAnalysis {
        title,
        description,
        category,
        details: if details.is_empty() { None } else { Some(details) },
        confidence: IMAGE_ANALYSIS_CONFIDENCE,
    }
}

/// Strip an ASCII case-insensitive label prefix.
///
/// `get` keeps the split on a char boundary, so multibyte text near a
/// would-be label never panics the slice.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label).then(|| line[label.len()..].trim())
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}
