use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::models::RecipeFeedback;
use crate::services::RecipeAnalyzer;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Outbound calls are bounded so a hung upstream cannot hang a request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed evaluation instruction sent with every image. Not configurable.
const PROMPT_RECETA_PRENATAL: &str = "\
Actúa como un dietista/nutricionista experto en salud materna. Evalúa la receta de la imagen y proporciona una calificación, opiniones y sugerencias para una madre gestante.

**Objetivo:**
Evaluar la idoneidad de la receta para una madre gestante, centrándose en su valor nutricional y seguridad.

**Formato de la Salida (Output Estructurado):**
1.  **rating:** Una calificación de 1 a 5, donde 5 es excelente.
2.  **opinions:** Una lista de opiniones sobre la receta, destacando los aspectos positivos y negativos para una madre gestante.
3.  **suggestions:** Una lista de sugerencias para mejorar la receta o alternativas más saludables.
";

// Gemini generateContent request structures
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Schema constraint sent to Gemini so its output matches [`RecipeFeedback`].
fn feedback_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "rating": { "type": "integer" },
            "opinions": {
                "type": "array",
                "items": { "type": "string" }
            },
            "suggestions": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["rating", "opinions", "suggestions"]
    })
}

pub struct GeminiService {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Uploaded files are asserted to be PNG; the bytes are not inspected.
    fn build_request(image: &[u8]) -> GenerateContentRequest {
        let base64_image = general_purpose::STANDARD.encode(image);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: PROMPT_RECETA_PRENATAL.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: base64_image,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: feedback_schema(),
            },
        }
    }
}

/// Pull the first candidate's first text part and parse it as RecipeFeedback.
fn parse_feedback(response: GenerateContentResponse) -> Result<RecipeFeedback> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Gemini returned no candidates"))?;

    let text = candidate
        .content
        .parts
        .into_iter()
        .find_map(|part| part.text)
        .ok_or_else(|| anyhow::anyhow!("Gemini candidate has no text part"))?;

    let feedback: RecipeFeedback = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Gemini response is not valid RecipeFeedback JSON: {}", e))?;

    Ok(feedback)
}

#[async_trait::async_trait]
impl RecipeAnalyzer for GeminiService {
    async fn analyze_recipe_image(&self, image: &[u8]) -> Result<RecipeFeedback> {
        log::debug!("📸 Starting recipe analysis, image size: {} bytes", image.len());

        let request = Self::build_request(image);
        let url = format!(
            "{}/models/{}:generateContent",
            GEMINI_BASE_URL, self.model
        );

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        log::debug!("📥 Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            log::error!("❌ Gemini API error response: {}", error_text);
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let completion: GenerateContentResponse = response.json().await?;
        let feedback = parse_feedback(completion)?;

        log::info!("✅ Recipe analyzed, rating: {}", feedback.rating);

        Ok(feedback)
    }
}
