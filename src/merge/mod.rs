//! PDF merging and cleanup
//!
//! [`merge_pdfs`] concatenates the pages of several PDF files, in the order
//! given, into one new file. Sources that cannot be read as PDFs are left out
//! and reported rather than aborting the merge.

mod cleanup;

pub use cleanup::{delete_downloaded_pdfs, CleanupReport, DeleteTarget};

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types rebuilt for the merged document rather than copied
const REBUILT_TYPES: [&[u8]; 5] = [b"Catalog", b"Pages", b"Page", b"Outlines", b"Outline"];

/// Errors that abort a merge
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no PDF files to merge")]
    NoSources,

    #[error("none of the {} PDF files could be read", skipped.len())]
    NoValidSources { skipped: Vec<(PathBuf, String)> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Result of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged file, once written
    pub output_path: Option<PathBuf>,

    /// Sources whose pages made it into the output, in order
    pub included: Vec<PathBuf>,

    /// Sources left out, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Merges `sources` into a single PDF at `output`
///
/// Pages keep the order of `sources`, and each source's own page order.
/// Unreadable, encrypted or page-less sources are skipped. No file is
/// written when no source is usable.
///
/// # Errors
///
/// - [`MergeError::NoSources`] when `sources` is empty
/// - [`MergeError::NoValidSources`] when every source was skipped
/// - [`MergeError::Io`] / [`MergeError::Pdf`] when writing the output fails
pub fn merge_pdfs(sources: &[PathBuf], output: &Path) -> Result<MergeOutcome, MergeError> {
    if sources.is_empty() {
        return Err(MergeError::NoSources);
    }

    let mut outcome = MergeOutcome::default();
    let mut loaded = Vec::new();

    for source in sources {
        match load_source(source) {
            Ok(doc) => {
                loaded.push(doc);
                outcome.included.push(source.clone());
            }
            Err(reason) => {
                tracing::warn!("Skipping {} in merge: {}", source.display(), reason);
                outcome.skipped.push((source.clone(), reason));
            }
        }
    }

    if loaded.is_empty() {
        return Err(MergeError::NoValidSources {
            skipped: outcome.skipped,
        });
    }

    let mut merged = combine(loaded);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    merged.save(output)?;

    tracing::info!(
        "Wrote {} ({} sources, {} skipped)",
        output.display(),
        outcome.included.len(),
        outcome.skipped.len()
    );
    outcome.output_path = Some(output.to_path_buf());
    Ok(outcome)
}

fn load_source(path: &Path) -> Result<Document, String> {
    let doc = Document::load(path).map_err(|e| e.to_string())?;
    if doc.is_encrypted() {
        return Err("document is encrypted".to_string());
    }
    if doc.get_pages().is_empty() {
        return Err("document has no pages".to_string());
    }
    Ok(doc)
}

/// Builds one document from the pages of `documents`, in order
fn combine(documents: Vec<Document>) -> Document {
    let mut merged = Document::with_version("1.5");
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut next_id = 1;

    for mut doc in documents {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        // get_pages is keyed by page number, so this is reading order
        for page_id in doc.get_pages().into_values() {
            if let Ok(page) = doc.get_dictionary(page_id) {
                pages.push((page_id, flatten_page(&doc, page)));
            }
        }

        for (id, object) in doc.objects {
            if !is_rebuilt(&object) {
                merged.objects.insert(id, object);
            }
        }
    }

    merged.max_id = next_id;
    let pages_id = merged.new_object_id();

    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    let count = pages.len() as i64;

    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(id, Object::Dictionary(page));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(count));
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = merged.add_object(Object::Dictionary(catalog));

    merged.trailer.set("Root", Object::Reference(catalog_id));
    merged.renumber_objects();
    merged.compress();
    merged
}

/// Copies a page, pulling in attributes it inherits from its page tree
fn flatten_page(doc: &Document, page: &Dictionary) -> Dictionary {
    let mut flat = page.clone();
    for key in INHERITABLE {
        if flat.has(key) {
            continue;
        }
        if let Some(value) = inherited(doc, page, key) {
            flat.set(key.to_vec(), value);
        }
    }
    flat
}

fn inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = page;
    // Bounded walk guards against Parent cycles in malformed files
    for _ in 0..32 {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

fn is_rebuilt(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    dict.get(b"Type")
        .and_then(Object::as_name)
        .map(|name| REBUILT_TYPES.iter().any(|t| *t == name))
        .unwrap_or(false)
}
