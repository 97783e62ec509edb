pub mod analyzer;
pub mod gemini; // Google Gemini multimodal service

pub use analyzer::RecipeAnalyzer;
pub use gemini::GeminiService;
