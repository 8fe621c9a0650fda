use crate::error::FormError;
use derivative::Derivative;
use log::warn;
use reqwest::multipart::Part;
use serde_json::Value;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct AttachedFile {
    pub name: String,
    #[derivative(Debug(format_with = "fmt_byte_count"))]
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

fn fmt_byte_count(bytes: &Vec<u8>, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "<{} bytes>", bytes.len())
}

impl AttachedFile {
    /// Accepts PDF and common image types; the content itself is not inspected.
    pub fn new(
        name: impl Into<String>,
        bytes: Vec<u8>,
        mime_hint: Option<&str>,
    ) -> Result<Self, FormError> {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FormError::UnsupportedFileType(name));
        }

        let mime = mime_hint
            .filter(|hint| is_valid_mime(hint))
            .or_else(|| mime_for_extension(&extension))
            .map(str::to_string);

        Ok(Self { name, bytes, mime })
    }

    pub fn from_path(path: &Path) -> Result<Self, FormError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let bytes = std::fs::read(path)
            .map_err(|e| FormError::Unexpected(format!("Failed to read file: {}", e)))?;
        Self::new(name, bytes, None)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Same check reqwest applies when the multipart part is built.
fn is_valid_mime(hint: &str) -> bool {
    let valid = Part::bytes(Vec::new()).mime_str(hint).is_ok();
    if !valid {
        warn!("Ignoring malformed content type hint {:?}", hint);
    }
    valid
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub customer_name: String,
    pub file: AttachedFile,
}

/// What the worker thread reports back once per submit.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub file_name: String,
    pub customer_name: String,
    pub result: Result<Value, FormError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documents_and_images_case_insensitively() {
        let pdf = AttachedFile::new("Invoice.PDF", b"%PDF".to_vec(), None).unwrap();
        assert_eq!(pdf.mime.as_deref(), Some("application/pdf"));

        let jpg = AttachedFile::new("scan.jpeg", vec![0xff, 0xd8], None).unwrap();
        assert_eq!(jpg.mime.as_deref(), Some("image/jpeg"));

        let hinted = AttachedFile::new("scan.png", vec![], Some("image/x-png")).unwrap();
        assert_eq!(hinted.mime.as_deref(), Some("image/x-png"));
        assert_eq!(hinted.size(), 0);
    }

    #[test]
    fn malformed_mime_hint_falls_back_to_extension() {
        let png = AttachedFile::new("scan.png", vec![1], Some("not a mime")).unwrap();
        assert_eq!(png.mime.as_deref(), Some("image/png"));

        let pdf = AttachedFile::new("doc.pdf", vec![1], Some("")).unwrap();
        assert_eq!(pdf.mime.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn rejects_other_file_types() {
        for name in ["notes.txt", "archive.pdf.zip", "README", ""] {
            assert_eq!(
                AttachedFile::new(name, vec![1, 2, 3], None),
                Err(FormError::UnsupportedFileType(name.to_string()))
            );
        }
    }

    #[test]
    fn debug_output_hides_file_contents() {
        let file = AttachedFile::new("a.pdf", vec![7; 2048], None).unwrap();
        let debug = format!("{:?}", file);
        assert!(debug.contains("<2048 bytes>"));
        assert!(!debug.contains("7, 7"));
    }
}
