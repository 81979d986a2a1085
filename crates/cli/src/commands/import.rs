//! Catalog import: push product JSON files to the admin API.
//!
//! Each `*.json` file in the directory holds an array of product documents
//! (the legacy per-category export: benches, chairs, desks, ...). Every
//! document is validated, normalized, and posted one by one; a per-file
//! summary is printed at the end.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};

/// Errors that can occur during an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Directory not found: {0}")]
    DirNotFound(String),

    #[error("No *.json files in {0}")]
    NoFiles(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{failed} of {total} products failed to import")]
    PartialFailure { failed: usize, total: usize },
}

/// Per-file import counters.
#[derive(Debug, Default)]
struct FileSummary {
    parsed: usize,
    skipped: usize,
    posted: usize,
    failed: usize,
}

/// Import every `*.json` catalog file in `dir`.
///
/// # Errors
///
/// Returns `ImportError` if the directory is unusable or any product failed
/// to import (partial progress is kept; the backend upserts by SKU).
pub async fn catalog(dir: &str, token: &str, dry_run: bool) -> Result<(), ImportError> {
    dotenvy::dotenv().ok();

    let api_base = {
        let raw = std::env::var("MEBLIHUB_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_owned());
        let trimmed = raw.trim_end_matches('/');
        format!("{}/api", trimmed.strip_suffix("/api").unwrap_or(trimmed))
    };

    let path = Path::new(dir);
    if !path.is_dir() {
        return Err(ImportError::DirNotFound(dir.to_owned()));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ImportError::NoFiles(dir.to_owned()));
    }

    info!(files = files.len(), dry_run, "Starting catalog import");

    let client = reqwest::Client::new();
    let mut total = 0;
    let mut failed = 0;

    for file in &files {
        let summary = import_file(&client, &api_base, token, file, dry_run).await?;
        info!(
            file = %file.display(),
            parsed = summary.parsed,
            skipped = summary.skipped,
            posted = summary.posted,
            failed = summary.failed,
            "File done"
        );
        total += summary.parsed;
        failed += summary.failed;
    }

    info!("Import complete: {total} products, {failed} failures");

    if failed > 0 {
        return Err(ImportError::PartialFailure { failed, total });
    }
    Ok(())
}

async fn import_file(
    client: &reqwest::Client,
    api_base: &str,
    token: &str,
    file: &Path,
    dry_run: bool,
) -> Result<FileSummary, ImportError> {
    let content = tokio::fs::read_to_string(file).await?;

    let rows: Vec<Value> = match serde_json::from_str(&content) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            warn!(file = %file.display(), "Not a JSON array, skipping file");
            return Ok(FileSummary::default());
        }
        Err(e) => {
            warn!(file = %file.display(), "Unparseable JSON, skipping file: {e}");
            return Ok(FileSummary::default());
        }
    };

    let mut summary = FileSummary::default();

    for row in rows {
        summary.parsed += 1;

        let Some(product) = normalize_product(&row) else {
            summary.skipped += 1;
            warn!(file = %file.display(), "Skipping product without a name");
            continue;
        };

        if dry_run {
            summary.posted += 1;
            continue;
        }

        let response = client
            .post(format!("{api_base}/admin/products"))
            .bearer_auth(token)
            .json(&product)
            .send()
            .await?;

        if response.status().is_success() {
            summary.posted += 1;
        } else {
            summary.failed += 1;
            error!(
                file = %file.display(),
                status = %response.status(),
                "Product rejected"
            );
        }
    }

    Ok(summary)
}

/// Normalize a legacy catalog row into the API's product document.
///
/// Legacy rows carry `name` as a plain string plus flat numeric dimensions;
/// rows without any name are unusable and dropped.
fn normalize_product(row: &Value) -> Option<Value> {
    let name = row.get("name")?;
    let name = match name {
        Value::String(s) if !s.trim().is_empty() => {
            serde_json::json!({ "ua": s.trim(), "en": s.trim() })
        }
        Value::Object(_) => name.clone(),
        _ => return None,
    };

    let mut product = serde_json::Map::new();
    product.insert("name".to_owned(), name);

    for key in ["image", "modelUrl", "category", "subCategory", "sku"] {
        if let Some(Value::String(s)) = row.get(key)
            && !s.trim().is_empty()
        {
            product.insert(key.to_owned(), Value::String(s.trim().to_owned()));
        }
    }

    for key in ["price", "discount", "width", "height", "depth", "weight"] {
        if let Some(value) = row.get(key)
            && value.is_number()
        {
            product.insert(key.to_owned(), value.clone());
        }
    }

    Some(Value::Object(product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_legacy_row() {
        let row = json!({
            "id": 7,
            "name": " Лавка Верона ",
            "image": "/catalog/benches/verona.jpg",
            "modelUrl": "/models/verona.glb",
            "width": 120,
            "height": 45,
            "depth": 38,
            "weight": 14.5,
        });

        let product = normalize_product(&row).expect("normalized");
        assert_eq!(product["name"]["ua"], "Лавка Верона");
        assert_eq!(product["name"]["en"], "Лавка Верона");
        assert_eq!(product["width"], 120);
        assert_eq!(product["weight"], 14.5);
        // Legacy numeric id is not forwarded; the backend assigns ids
        assert!(product.get("id").is_none());
    }

    #[test]
    fn test_normalize_keeps_localized_name() {
        let row = json!({"name": {"ua": "Стіл", "en": "Desk"}, "price": 4500});
        let product = normalize_product(&row).expect("normalized");
        assert_eq!(product["name"]["en"], "Desk");
        assert_eq!(product["price"], 4500);
    }

    #[test]
    fn test_normalize_rejects_nameless() {
        assert!(normalize_product(&json!({"price": 100})).is_none());
        assert!(normalize_product(&json!({"name": "  "})).is_none());
        assert!(normalize_product(&json!({"name": 42})).is_none());
    }
}
