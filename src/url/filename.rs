use std::path::{Path, PathBuf};
use url::Url;

/// Longest file name we write, including the extension
const MAX_FILENAME_LEN: usize = 200;

/// Name used when nothing usable survives sanitization
const FALLBACK_FILENAME: &str = "downloaded.pdf";

/// Returns the final path segment of a URL, percent-decoded
///
/// The query string and fragment are not part of the filename. Strings that
/// do not parse as URLs fall back to the text after the last `/`.
///
/// # Examples
///
/// ```
/// use pdf_trawler::url::filename_from_url;
///
/// assert_eq!(filename_from_url("https://x.com/a/Annual%20Report.pdf?v=1"), "Annual Report.pdf");
/// assert_eq!(filename_from_url("https://x.com/docs/"), "");
/// ```
pub fn filename_from_url(url: &str) -> String {
    let raw = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => {
            let without_query = url.split(['?', '#']).next().unwrap_or(url);
            without_query
                .rsplit('/')
                .next()
                .unwrap_or(without_query)
                .to_string()
        }
    };

    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Turns an untrusted name into a safe `.pdf` file name
///
/// - percent-decodes, then keeps only the base name
/// - removes path separators and NUL bytes
/// - strips leading dots so the file is never hidden
/// - replaces `< > : " | ? *` with `_`
/// - falls back to `downloaded.pdf` when nothing is left
/// - guarantees a `.pdf` extension and caps the length at 200 characters
pub fn sanitize_filename(name: &str) -> String {
    let decoded = urlencoding::decode(name)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| name.to_string());

    let base = decoded
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| *c != '\0')
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.eq_ignore_ascii_case(".pdf") {
        return FALLBACK_FILENAME.to_string();
    }

    let cleaned = cleaned.trim_start_matches('.').trim_start();
    if cleaned.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    // Split off an existing extension, keeping its original case
    let (stem, ext) = if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.split_at(cleaned.len() - 4)
    } else {
        (cleaned, ".pdf")
    };

    let max_stem = MAX_FILENAME_LEN - ext.len();
    let stem: String = stem.chars().take(max_stem).collect();
    format!("{stem}{ext}")
}

/// Resolves a file path in `dir` that does not exist yet
///
/// `report.pdf` is used when free, otherwise `report_1.pdf`, `report_2.pdf`
/// and so on. The first free name wins, so repeated runs in an unchanged
/// directory pick the same names.
pub fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    };

    let mut counter: u64 = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
