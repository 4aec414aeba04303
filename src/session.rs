//! The editing session.
//!
//! Owns the one [`ContentModel`] of an open project together with the style
//! catalogs and template registry, and threads them through resolve, assemble,
//! codec and storage. The model is only mutated here, between assembly runs.
//!
//! ## Saving
//!
//! [`EditingSession::save`] writes the artifact, then (with `export.verify`)
//! reads it back, decodes the embedded snapshot and checks that the saved
//! title matches the live one. On mismatch it restores the backup, regenerates
//! and writes exactly once more without taking a new backup. A second mismatch
//! restores the backup again and fails with [`SaveError::Verification`]. The
//! in-memory model is never touched by a save.

use crate::assemble::{self, AssembleError, Artifact, AssemblyReport};
use crate::assets::{self, AssetCopy};
use crate::codec::{self, ImportError};
use crate::config::ExportConfig;
use crate::model::{ContentModel, Element};
use crate::storage::{ProjectStorage, SaveOptions, SaveReceipt, StorageError};
use crate::templates::TemplateRegistry;
use crate::theme::{self, Catalogs, ResolvedTheme};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("saved artifact does not match the project (expected title {expected:?}, found {found:?})")]
    Verification {
        expected: String,
        found: Option<String>,
    },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("no custom page with id `{0}`")]
    UnknownPage(String),
    #[error("template `{template}` does not allow another `{element_type}` on page `{page}`")]
    NotAllowed {
        page: String,
        template: String,
        element_type: String,
    },
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub receipt: SaveReceipt,
    pub report: AssemblyReport,
    /// Whether the first write failed verification and was regenerated.
    pub retried: bool,
}

pub struct EditingSession {
    content: ContentModel,
    catalogs: Catalogs,
    registry: TemplateRegistry,
    export: ExportConfig,
}

impl EditingSession {
    pub fn new(
        content: ContentModel,
        catalogs: Catalogs,
        registry: TemplateRegistry,
        export: ExportConfig,
    ) -> Self {
        Self {
            content,
            catalogs,
            registry,
            export,
        }
    }

    /// An empty project with the built-in catalogs and templates.
    pub fn with_builtin(export: ExportConfig) -> Self {
        Self::new(
            ContentModel::default(),
            Catalogs::builtin(),
            TemplateRegistry::with_builtin(),
            export,
        )
    }

    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentModel {
        &mut self.content
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.registry
    }

    pub fn theme(&self) -> ResolvedTheme {
        theme::resolve(&self.content.appearance, &self.catalogs)
    }

    pub fn export(&self) -> Result<Artifact, AssembleError> {
        assemble::assemble(&self.content, &self.theme(), &self.registry)
    }

    pub fn required_assets(&self) -> Vec<AssetCopy> {
        assets::required_assets(&self.theme())
    }

    /// Replace the model with the snapshot embedded in `artifact`.
    /// On error the current model is kept as is.
    pub fn import(&mut self, artifact: &str) -> Result<(), ImportError> {
        let content = codec::decode(artifact, &self.catalogs)?;
        self.content = content;
        Ok(())
    }

    pub fn load(&mut self, storage: &dyn ProjectStorage, project: &str) -> Result<(), LoadError> {
        let text = storage.load_project(project, &self.export.file_name)?;
        self.import(&text)?;
        log::debug!("loaded project `{project}`");
        Ok(())
    }

    pub fn save(&self, storage: &dyn ProjectStorage, project: &str) -> Result<SaveOutcome, SaveError> {
        let file_name = self.export.file_name.as_str();
        let artifact = self.export()?;
        let options = SaveOptions {
            skip_backup: !self.export.backup,
            assets: self.required_assets(),
        };
        let receipt = storage.save_artifact(project, file_name, &artifact.to_html(), &options)?;

        if !self.export.verify {
            return Ok(SaveOutcome {
                receipt,
                report: artifact.report,
                retried: false,
            });
        }

        let expected = self.content.basic.title.clone();
        let found = self.saved_title(storage, project)?;
        if found.as_deref() == Some(expected.as_str()) {
            return Ok(SaveOutcome {
                receipt,
                report: artifact.report,
                retried: false,
            });
        }

        log::warn!(
            "saved artifact for `{project}` failed verification (title {found:?}), regenerating"
        );
        if receipt.backed_up {
            storage.restore_backup(project, file_name)?;
        }
        let artifact = self.export()?;
        let retry = SaveOptions {
            skip_backup: true,
            ..options
        };
        let mut second = storage.save_artifact(project, file_name, &artifact.to_html(), &retry)?;
        second.backed_up = receipt.backed_up;

        let found = self.saved_title(storage, project)?;
        if found.as_deref() == Some(expected.as_str()) {
            return Ok(SaveOutcome {
                receipt: second,
                report: artifact.report,
                retried: true,
            });
        }
        if receipt.backed_up {
            storage.restore_backup(project, file_name)?;
        }
        Err(SaveError::Verification { expected, found })
    }

    /// Title decoded from the stored artifact, or `None` if it does not decode.
    fn saved_title(
        &self,
        storage: &dyn ProjectStorage,
        project: &str,
    ) -> Result<Option<String>, StorageError> {
        let text = storage.load_project(project, &self.export.file_name)?;
        match codec::decode(&text, &self.catalogs) {
            Ok(saved) => Ok(Some(saved.basic.title)),
            Err(err) => {
                log::warn!("saved artifact for `{project}` does not decode: {err}");
                Ok(None)
            }
        }
    }

    /// Append an element to a custom page if its template allows it.
    /// Returns the `order` assigned to the new element.
    pub fn add_element(&mut self, page_id: &str, mut element: Element) -> Result<i64, EditError> {
        let page = self
            .content
            .custom_page_mut(page_id)
            .ok_or_else(|| EditError::UnknownPage(page_id.to_string()))?;
        if !self
            .registry
            .can_add_element(&page.template, &element.element_type, &page.elements)
        {
            return Err(EditError::NotAllowed {
                page: page_id.to_string(),
                template: page.template.clone(),
                element_type: element.element_type,
            });
        }
        element.order = page.next_order();
        let order = element.order;
        page.elements.push(element);
        Ok(order)
    }
}
