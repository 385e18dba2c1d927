// Corpus loader: reads the output of the extraction stage.
//
// Layout expected under the corpus root:
//   extracted_text/       one .txt file per document (the unit of identity)
//   word_files/           original .docx sources (optional)
//   pdf_files/            original .pdf sources (optional)
//   pptx_files/           original .pptx sources (optional)
//   xlsx_files/           original .xlsx sources (optional)
//   metadata/metadata.json   filename -> free-form metadata object (optional)
//
// A document's declared type is resolved by matching its base name
// against the source folders; anything unmatched is tagged `unknown`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Corpus, DocType, Document};

/// Source folder names and the format they imply.
const SOURCE_FOLDERS: &[(&str, DocType)] = &[
    ("word_files", DocType::Docx),
    ("pdf_files", DocType::Pdf),
    ("pptx_files", DocType::Pptx),
    ("xlsx_files", DocType::Xlsx),
];

/// Subdirectory holding the extracted plain text.
pub const EXTRACTED_TEXT_DIR: &str = "extracted_text";

/// Load every extracted document under `root`, resolving source types
/// and merging `metadata/metadata.json` if present.
///
/// Documents come back sorted by name so runs are reproducible
/// regardless of directory iteration order.
pub fn load_corpus(root: &Path) -> Result<Corpus> {
    let extracted = root.join(EXTRACTED_TEXT_DIR);
    if !extracted.is_dir() {
        anyhow::bail!(
            "Extracted text folder not found: {}\nRun your extraction stage first.",
            extracted.display()
        );
    }

    let mut documents = Vec::new();

    for entry in fs::read_dir(&extracted)
        .with_context(|| format!("Failed to read {}", extracted.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc_type = resolve_source_type(root, &name);

        debug!(
            name = name,
            chars = text.len(),
            doc_type = %doc_type,
            "Loaded document"
        );

        documents.push(Document {
            name,
            text,
            doc_type,
        });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));

    let metadata = load_metadata(root)?;

    Ok(Corpus {
        documents,
        metadata,
    })
}

/// Determine a document's original format by checking which source
/// folder contains a file with the same base name.
fn resolve_source_type(root: &Path, filename: &str) -> DocType {
    let base = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    for (folder, doc_type) in SOURCE_FOLDERS {
        let dir = root.join(folder);
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let candidate = entry.path();
            let stem = candidate.file_stem().and_then(|s| s.to_str());
            if stem == Some(base) {
                return *doc_type;
            }
        }
    }

    DocType::Unknown
}

/// Load `metadata/metadata.json` if present. A missing file is fine
/// (metadata only enriches the report); a malformed one is an error.
fn load_metadata(root: &Path) -> Result<HashMap<String, Value>> {
    let path = root.join("metadata").join("metadata.json");
    if !path.exists() {
        warn!("No metadata.json found; report entries will carry empty metadata");
        return Ok(HashMap::new());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let metadata: HashMap<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed metadata file {}", path.display()))?;

    debug!(documents = metadata.len(), "Loaded external metadata");
    Ok(metadata)
}
