mod models;
mod server;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use server::create_router;
use services::{GeminiService, RecipeAnalyzer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Prenatal Recipe Analysis API...");

    // Load configuration
    let api_key = env::var("GOOGLE_API_KEY")
        .expect("GOOGLE_API_KEY must be set in .env file");

    let model = env::var("GEMINI_MODEL")
        .unwrap_or_else(|_| "gemini-2.5-flash".to_string());

    let port = env::var("PORT").unwrap_or_else(|_| "5001".to_string());

    let analyzer = Arc::new(GeminiService::new(api_key, model.clone())) as Arc<dyn RecipeAnalyzer>;
    log::info!("✅ Gemini service initialized with model: {}", model);

    let app = create_router(analyzer);

    let addr = format!("0.0.0.0:{}", port);
    log::info!("🌐 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("\n🥗 Prenatal Recipe Analysis API");
    println!("🌐 Listening on http://localhost:{}", port);
    println!("📸 POST /analyze-recipe with a multipart 'file' field (PNG)");
    println!("\n🛑 Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
