use crate::error::FormError;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const EXTRACTION_POINTER: &str = "/data/extracted_data/gpt_extraction_output";

/// Body of the last successful extraction, kept until the next submit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    body: Value,
}

impl ProcessingResult {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// `null` and empty containers/strings count as missing.
    pub fn extraction_output(&self) -> Option<&Value> {
        self.body
            .pointer(EXTRACTION_POINTER)
            .filter(|value| !is_blank(value))
    }

    pub fn view(&self, file_name: Option<&str>, customer_name: &str) -> ResultView<'_> {
        let extracted = self.extraction_output().map(|output| ExtractedJson {
            pretty: pretty_json(output),
            download_name: download_file_name(file_name, customer_name),
        });

        ResultView {
            extracted,
            raw: &self.body,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedJson {
    pub pretty: String,
    pub download_name: String,
}

impl ExtractedJson {
    pub fn payload(&self) -> &[u8] {
        self.pretty.as_bytes()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), FormError> {
        fs::write(path, self.payload()).map_err(|e| FormError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Saved extracted JSON to {}", path.display());
        Ok(())
    }
}

/// What the result section draws for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    /// `None` means the warning is shown instead.
    pub extracted: Option<ExtractedJson>,
    pub raw: &'a Value,
}

pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn download_file_name(file_name: Option<&str>, customer_name: &str) -> String {
    let stem = file_name
        .map(|name| {
            Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        })
        .filter(|stem| !stem.is_empty());

    match stem {
        Some(stem) => format!("{}_{}_extracted.json", stem, customer_name),
        None => format!("extracted_{}.json", customer_name),
    }
}
