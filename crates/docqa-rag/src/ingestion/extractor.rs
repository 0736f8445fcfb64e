//! Text extraction by file extension

use std::path::Path;

use crate::error::{Error, Result};

/// Extracts plain text from a file on disk
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of `path`
    fn extract(&self, path: &Path) -> Result<String>;

    /// Whether files with this lower-case extension (no dot) can be read
    fn supports(&self, extension: &str) -> bool;
}

/// Extractor for `.txt`, `.md`, `.pdf` and `.docx` files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_text_file(path: &Path, filename: &str) -> Result<String> {
        let data = std::fs::read(path)?;
        String::from_utf8(data).map_err(|e| Error::extraction(filename, format!("not valid UTF-8: {}", e)))
    }

    fn extract_pdf(path: &Path, filename: &str) -> Result<String> {
        let data = std::fs::read(path)?;
        let content = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        Ok(content
            .replace('\0', "")
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn extract_docx(path: &Path, filename: &str) -> Result<String> {
        let data = std::fs::read(path)?;
        let doc = docx_rs::read_docx(&data).map_err(|e| Error::extraction(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content)
    }
}

impl TextExtractor for FileTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "text" | "md" | "markdown" => Self::extract_text_file(path, &filename),
            "pdf" => Self::extract_pdf(path, &filename),
            "docx" => Self::extract_docx(path, &filename),
            _ => Err(Error::UnsupportedFileType(format!(".{}", extension))),
        }
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, "txt" | "text" | "md" | "markdown" | "pdf" | "docx")
    }
}
