//! Knowledge base upload command

use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::api::ApiClient;
use crate::error::Result;

/// Uploads a PDF into the knowledge base
pub async fn upload(client: &ApiClient, file: &Path) -> Result<()> {
    client
        .upload_knowledge(file)
        .await
        .with_context(|| format!("Could not upload {}", file.display()))?;

    println!(
        "{} Added {} to the knowledge base",
        "✓".green(),
        file.display().to_string().bold()
    );
    Ok(())
}
