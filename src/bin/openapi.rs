use anyhow::Result;
use stellarcompass::web::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let doc = ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&doc)?;
    println!("{json}");
    Ok(())
}
