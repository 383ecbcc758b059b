//! Attachment extension allow-list

use crate::core::error::ValidationError;

/// Extensions accepted when no configuration overrides them
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Which attachments may be uploaded as a proof of purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPolicy {
    allowed: Vec<String>,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl AttachmentPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Check a file name's extension, case-insensitively
    pub fn check(&self, file_name: &str) -> Result<(), ValidationError> {
        let accepted = extension(file_name)
            .map(|ext| self.allowed.iter().any(|a| *a == ext))
            .unwrap_or(false);

        if accepted {
            Ok(())
        } else {
            Err(ValidationError::FileExtension {
                file_name: file_name.to_string(),
                allowed: self.allowed.clone(),
            })
        }
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        self.check(file_name).is_ok()
    }
}

/// Lowercased extension after the last dot, if any
fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
