use anyhow::Result;

use crate::models::RecipeFeedback;

/// Trait for recipe analysis backends (Gemini today, mockable in tests)
#[async_trait::async_trait]
pub trait RecipeAnalyzer: Send + Sync {
    async fn analyze_recipe_image(&self, image: &[u8]) -> Result<RecipeFeedback>;
}
