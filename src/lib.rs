//! Typesets a personal cookbook into a LaTeX document.
//!
//! The [`latex`] module is a small append-only document builder; the
//! [`translator`] maps a [`Cookbook`] onto it. Around that core sit the JSON
//! [`store`], the external [`compiler`], the form-shaped [`editor`] session
//! and the [`CookbookExporter`] builder tying everything together.

pub mod builder;
pub mod compiler;
pub mod config;
pub mod editor;
pub mod error;
pub mod latex;
pub mod model;
pub mod store;
pub mod translator;

pub use builder::{CookbookExporter, CookbookExporterBuilder, ExportResult, OutputMode};
pub use compiler::{DocumentCompiler, LatexCompiler};
pub use config::AppConfig;
pub use editor::{DraftId, EditorSession, IngredientDraft, RecipeDraft};
pub use error::CookbookError;
pub use latex::{LatexDocument, LatexError};
pub use model::{group_by, Cookbook, Ingredient, Recipe};
pub use store::CookbookStore;
pub use translator::{CookbookTranslator, Labels};

/// Render a cookbook to LaTeX with the default German layout.
///
/// # Arguments
/// * `cookbook` - A cookbook satisfying every data model invariant
///
/// # Errors
/// Returns `CookbookError::Validation` for an invalid cookbook
pub fn render(cookbook: &Cookbook) -> Result<String, CookbookError> {
    cookbook.validate()?;
    let source = CookbookTranslator::new().translate(cookbook)?.serialize()?;
    Ok(source)
}

/// Load the cookbook at the configured path and render it with the configured texts.
pub async fn render_stored(config: &AppConfig) -> Result<String, CookbookError> {
    let cookbook = CookbookStore::new(&config.cookbook_path).load().await?;
    let translator = CookbookTranslator::new()
        .with_labels(config.document.labels.clone())
        .with_locale(config.document.locale()?);
    Ok(translator.translate(&cookbook)?.serialize()?)
}

/// Load, translate and compile the stored cookbook.
///
/// # Returns
/// The path of the compiled document
pub async fn export_pdf(config: &AppConfig) -> Result<std::path::PathBuf, CookbookError> {
    let result = CookbookExporter::builder()
        .store(CookbookStore::new(&config.cookbook_path))
        .labels(config.document.labels.clone())
        .locale(config.document.locale()?)
        .latex_config(config.latex.clone())
        .build()
        .await?;

    match result {
        ExportResult::Pdf(path) => Ok(path),
        ExportResult::Latex(_) => Err(CookbookError::Builder(
            "export produced LaTeX instead of a compiled document".to_string(),
        )),
    }
}
