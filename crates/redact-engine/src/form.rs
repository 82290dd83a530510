//! Upload form state: the chosen document, the category set and the last error

use redact_core::{
    AcceptList, CategorySelection, Error, FilenamePolicy, RedactionCategory, Result, UploadedFile,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct UploadForm {
    pub(crate) file: Option<UploadedFile>,
    selection: CategorySelection,
    accept: AcceptList,
    pub(crate) policy: FilenamePolicy,
    pub(crate) error: Option<String>,
}

impl UploadForm {
    /// Empty form with every category selected
    pub fn new(accept: AcceptList, policy: FilenamePolicy) -> Self {
        Self {
            file: None,
            selection: CategorySelection::all(),
            accept,
            policy,
            error: None,
        }
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn policy(&self) -> FilenamePolicy {
        self.policy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the current document; any previous error is cleared
    pub fn set_file(&mut self, file: UploadedFile) {
        debug!("Selected {} ({} bytes)", file.name, file.size());
        self.file = Some(file);
        self.error = None;
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// Pick a document from disk
    pub async fn select(&mut self, path: &Path) -> Result<()> {
        let name = display_name(path);
        if !self.accept.is_accepted(&name) {
            return Err(self.reject(Error::UnsupportedFileType(name)));
        }

        match UploadedFile::from_path(path).await {
            Ok(file) => {
                self.set_file(file);
                Ok(())
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Keep the first accepted path of a multi-file drop and ignore the rest.
    /// With no accepted path the current document stays as it was.
    pub async fn drop_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        let Some(first) = paths
            .iter()
            .find(|p| self.accept.is_accepted(&display_name(p)))
        else {
            let names: Vec<String> = paths.iter().map(|p| display_name(p)).collect();
            return Err(self.reject(Error::UnsupportedFileType(names.join(", "))));
        };

        if paths.len() > 1 {
            debug!("Dropped {} files, keeping {}", paths.len(), first.display());
        }
        let first = first.clone();
        self.select(&first).await
    }

    pub fn toggle(&mut self, category: RedactionCategory) {
        self.selection.toggle(category);
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all();
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected()
    }

    pub fn set_selection(&mut self, selection: CategorySelection) {
        self.selection = selection;
    }

    fn reject(&mut self, err: Error) -> Error {
        warn!("Rejected upload: {}", err);
        self.error = Some(err.to_string());
        err
    }
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new(AcceptList::default(), FilenamePolicy::default())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
