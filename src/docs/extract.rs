use super::error::DocError;
use super::schema::ReadResult;
use super::storage;
use std::fs;
use std::path::Path;

/// Document formats the reader knows how to decode, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    WordProcessor,
}

impl DocumentFormat {
    /// Pick the decoder from the lower-cased extension. Anything unknown is
    /// treated as text.
    pub fn from_path(path: &Path) -> Self {
        match storage::dotted_extension(path).as_deref() {
            Some(".pdf") => Self::Pdf,
            Some(".docx") | Some(".doc") => Self::WordProcessor,
            _ => Self::PlainText,
        }
    }

    pub fn required_capability(self) -> Option<Capability> {
        match self {
            Self::PlainText => None,
            Self::Pdf => Some(Capability::Pdf),
            Self::WordProcessor => Some(Capability::WordProcessor),
        }
    }
}

/// Optional decoding support that may be missing from a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Pdf,
    WordProcessor,
}

impl Capability {
    fn missing_message(self) -> &'static str {
        match self {
            Self::Pdf => "PDF support not installed",
            Self::WordProcessor => "word-processor support not installed",
        }
    }
}

/// The set of capabilities a reader may use.
///
/// Starts from what was compiled in (cargo features `pdf`, `docx`); it can be
/// narrowed at runtime but never widened past the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pdf: bool,
    word: bool,
}

impl Capabilities {
    pub fn compiled() -> Self {
        Self {
            pdf: cfg!(feature = "pdf"),
            word: cfg!(feature = "docx"),
        }
    }

    pub fn none() -> Self {
        Self {
            pdf: false,
            word: false,
        }
    }

    pub fn without(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Pdf => self.pdf = false,
            Capability::WordProcessor => self.word = false,
        }
        self
    }

    pub fn is_available(&self, capability: Capability) -> bool {
        match capability {
            Capability::Pdf => self.pdf,
            Capability::WordProcessor => self.word,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Decodes documents into plain text.
#[derive(Debug, Clone, Default)]
pub struct DocumentReader {
    capabilities: Capabilities,
}

impl DocumentReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Read `path` and extract its text.
    ///
    /// Never panics or returns `Err`: every failure is reported in the
    /// returned `ReadResult`, with metadata populated whenever the file exists.
    pub fn decode(&self, path: &Path) -> ReadResult {
        let metadata = match storage::metadata(path) {
            Ok(m) => m,
            Err(e) => return ReadResult::failed(e, None),
        };

        let format = DocumentFormat::from_path(path);
        if let Some(capability) = format.required_capability() {
            if !self.capabilities.is_available(capability) {
                tracing::debug!("{:?} unavailable for {}", capability, path.display());
                let message = capability.missing_message().to_string();
                return ReadResult::failed(
                    DocError::CapabilityUnavailable(message),
                    Some(metadata),
                );
            }
        }

        let decoded = match format {
            DocumentFormat::PlainText => decode_plain_text(path),
            DocumentFormat::Pdf => decode_pdf(path),
            DocumentFormat::WordProcessor => decode_word(path),
        };

        match decoded {
            Ok(text) => {
                tracing::debug!(
                    "Decoded {} ({:?}): {} chars",
                    path.display(),
                    format,
                    text.chars().count()
                );
                ReadResult::ok(text, metadata)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                ReadResult::failed(e, Some(metadata))
            }
        }
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DocError> {
    fs::read(path).map_err(|e| DocError::decode(path.display().to_string(), e))
}

// Invalid UTF-8 becomes U+FFFD; content is otherwise returned verbatim.
fn decode_plain_text(path: &Path) -> Result<String, DocError> {
    let bytes = read_bytes(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(feature = "pdf")]
fn decode_pdf(path: &Path) -> Result<String, DocError> {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let bytes = read_bytes(path)?;
    let doc = match catch_unwind(AssertUnwindSafe(|| lopdf::Document::load_mem(&bytes))) {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => return Err(DocError::decode(path.display().to_string(), e)),
        Err(_) => {
            return Err(DocError::decode(
                path.display().to_string(),
                "PDF parser panicked on malformed input",
            ));
        }
    };

    // A bad page contributes nothing; it never fails the document.
    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|page_no| page_text(&doc, page_no, path))
        .collect();

    Ok(pages.join("\n").trim().to_string())
}

#[cfg(feature = "pdf")]
fn page_text(doc: &lopdf::Document, page_no: u32, path: &Path) -> String {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    match catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_no]))) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::debug!("Page {} of {}: {}", page_no, path.display(), e);
            String::new()
        }
        Err(_) => {
            tracing::debug!("Page {} of {} panicked", page_no, path.display());
            String::new()
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn decode_pdf(_path: &Path) -> Result<String, DocError> {
    Err(DocError::CapabilityUnavailable(
        Capability::Pdf.missing_message().to_string(),
    ))
}

#[cfg(feature = "docx")]
fn decode_word(path: &Path) -> Result<String, DocError> {
    use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

    fn push_run(run: &Run, out: &mut String) {
        for child in &run.children {
            match child {
                RunChild::Text(text) => out.push_str(&text.text),
                RunChild::Tab(_) => out.push('\t'),
                RunChild::Break(_) => out.push('\n'),
                _ => {}
            }
        }
    }

    fn paragraph_text(paragraph: &Paragraph) -> String {
        let mut text = String::new();
        for child in &paragraph.children {
            match child {
                ParagraphChild::Run(run) => push_run(run, &mut text),
                ParagraphChild::Hyperlink(link) => {
                    for inner in &link.children {
                        if let ParagraphChild::Run(run) = inner {
                            push_run(run, &mut text);
                        }
                    }
                }
                _ => {}
            }
        }
        text
    }

    let bytes = read_bytes(path)?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| DocError::decode(path.display().to_string(), e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n").trim().to_string())
}

#[cfg(not(feature = "docx"))]
fn decode_word(_path: &Path) -> Result<String, DocError> {
    Err(DocError::CapabilityUnavailable(
        Capability::WordProcessor.missing_message().to_string(),
    ))
}
