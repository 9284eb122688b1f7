use chrono::{Locale, NaiveDate};
use log::info;
use std::path::PathBuf;

use crate::compiler::{DocumentCompiler, LatexCompiler};
use crate::config::LatexConfig;
use crate::store::CookbookStore;
use crate::translator::{CookbookTranslator, Labels};
use crate::{Cookbook, CookbookError};

/// Where the cookbook comes from
#[derive(Debug, Clone)]
pub enum CookbookSource {
    /// A cookbook value already in memory
    Value(Cookbook),
    /// The JSON file behind a store
    Store(CookbookStore),
}

/// Represents the desired output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Compile the document with the external engine (default)
    #[default]
    Pdf,
    /// Return the LaTeX source without compiling it
    Latex,
}

/// Result of an export operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    /// Serialized LaTeX source
    Latex(String),
    /// Path of the compiled document
    Pdf(PathBuf),
}

/// Builder for configuring and executing cookbook exports
#[derive(Default)]
pub struct CookbookExporterBuilder {
    source: Option<CookbookSource>,
    mode: OutputMode,
    labels: Option<Labels>,
    locale: Option<Locale>,
    date: Option<NaiveDate>,
    latex: Option<LatexConfig>,
    compiler: Option<Box<dyn DocumentCompiler>>,
}

impl CookbookExporterBuilder {
    /// Export this cookbook.
    ///
    /// The value is moved into the builder, so later edits by the caller do
    /// not affect a running export.
    ///
    /// # Example
    /// ```
    /// use cookbook_tex::{CookbookExporter, Cookbook};
    /// use std::collections::BTreeSet;
    ///
    /// let cookbook = Cookbook {
    ///     name: "Family".to_string(),
    ///     author: "Sam".to_string(),
    ///     recipes: BTreeSet::new(),
    /// };
    /// let builder = CookbookExporter::builder().cookbook(cookbook);
    /// ```
    pub fn cookbook(mut self, cookbook: Cookbook) -> Self {
        self.source = Some(CookbookSource::Value(cookbook));
        self
    }

    /// Load the cookbook from a store when the export runs.
    pub fn store(mut self, store: CookbookStore) -> Self {
        self.source = Some(CookbookSource::Store(store));
        self
    }

    /// Stop after generating the LaTeX source.
    ///
    /// # Example
    /// ```
    /// use cookbook_tex::CookbookExporter;
    ///
    /// let builder = CookbookExporter::builder().latex_only();
    /// ```
    pub fn latex_only(mut self) -> Self {
        self.mode = OutputMode::Latex;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Locale for the month name on the title page
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Print this date on the title page instead of today's
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Settings for the default LaTeX engine
    pub fn latex_config(mut self, config: LatexConfig) -> Self {
        self.latex = Some(config);
        self
    }

    /// Use a custom compiler instead of the configured LaTeX engine
    pub fn compiler(mut self, compiler: Box<dyn DocumentCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Build and execute the export
    ///
    /// # Errors
    /// Returns `CookbookError` if:
    /// - No cookbook source was specified
    /// - The stored cookbook cannot be read or is invalid
    /// - The given cookbook violates a data model invariant
    /// - The document compiler fails
    pub async fn build(self) -> Result<ExportResult, CookbookError> {
        let source = self.source.ok_or_else(|| {
            CookbookError::Builder(
                "No cookbook specified. Use .cookbook() or .store()".to_string(),
            )
        })?;

        let cookbook = match source {
            CookbookSource::Value(cookbook) => {
                cookbook.validate()?;
                cookbook
            }
            CookbookSource::Store(store) => store.load().await?,
        };

        let mut translator = CookbookTranslator::new();
        if let Some(labels) = self.labels {
            translator = translator.with_labels(labels);
        }
        if let Some(locale) = self.locale {
            translator = translator.with_locale(locale);
        }
        if let Some(date) = self.date {
            translator = translator.with_date(date);
        }

        let source = translator.translate(&cookbook)?.serialize()?;
        info!(
            "Generated LaTeX for '{}' ({} bytes)",
            cookbook.name,
            source.len()
        );

        match self.mode {
            OutputMode::Latex => Ok(ExportResult::Latex(source)),
            OutputMode::Pdf => {
                let latex = self.latex.unwrap_or_default();
                let compiler = self
                    .compiler
                    .unwrap_or_else(|| Box::new(LatexCompiler::new(&latex)));
                info!("Compiling with {}", compiler.name());
                let pdf = compiler.compile(&source, &latex.job_name).await?;
                Ok(ExportResult::Pdf(pdf))
            }
        }
    }
}

/// Main entry point for the builder API
pub struct CookbookExporter;

impl CookbookExporter {
    /// Creates a new builder for exporting a cookbook
    ///
    /// # Example
    /// ```
    /// use cookbook_tex::CookbookExporter;
    ///
    /// let builder = CookbookExporter::builder();
    /// ```
    pub fn builder() -> CookbookExporterBuilder {
        CookbookExporterBuilder::default()
    }
}
