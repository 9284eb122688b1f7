use log::debug;
use std::fmt::Display;

use super::{command, LatexError};

const PLACEHOLDER: char = '%';
const DOCUMENT_ENVIRONMENT: &str = "document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Body,
    Closed,
}

/// An ordered, append-only buffer of LaTeX lines.
///
/// Every operation appends to the content and returns the document again so
/// calls can be chained with `?`:
///
/// ```
/// use cookbook_tex::latex::LatexDocument;
///
/// # fn main() -> Result<(), cookbook_tex::latex::LatexError> {
/// let mut doc = LatexDocument::new("article", "");
/// doc.declare_preamble_option("babel", Some("ngerman"))?
///     .begin_document_body()?
///     .emit_formatted("% Rezepte", &[&3])?
///     .end_document_body()?;
/// assert!(doc.serialize()?.contains("3 Rezepte"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LatexDocument {
    lines: Vec<String>,
    open_blocks: Vec<String>,
    phase: Phase,
}

impl LatexDocument {
    /// Start a document of the given class; `options` may be empty.
    pub fn new(class: &str, options: &str) -> Self {
        let header = if options.is_empty() {
            command("documentclass", [class])
        } else {
            format!("\\documentclass[{options}]{{{class}}}")
        };
        LatexDocument {
            lines: vec![header],
            open_blocks: Vec::new(),
            phase: Phase::Preamble,
        }
    }

    /// Append a `\usepackage` directive.
    pub fn declare_preamble_option(
        &mut self,
        package: &str,
        parameter: Option<&str>,
    ) -> Result<&mut Self, LatexError> {
        self.require_phase(Phase::Preamble, "preamble directive")?;
        if package.trim().is_empty() {
            return Err(LatexError::Structure(
                "package name must not be empty".to_string(),
            ));
        }
        let line = match parameter {
            Some(parameter) => format!("\\usepackage[{parameter}]{{{package}}}"),
            None => command("usepackage", [package]),
        };
        self.lines.push(line);
        Ok(self)
    }

    pub fn set_title_metadata(
        &mut self,
        title: &str,
        author: &str,
    ) -> Result<&mut Self, LatexError> {
        self.require_phase(Phase::Preamble, "title metadata")?;
        self.lines.push(command("title", [title]));
        self.lines.push(command("author", [author]));
        Ok(self)
    }

    pub fn begin_document_body(&mut self) -> Result<&mut Self, LatexError> {
        self.require_phase(Phase::Preamble, "begin of document body")?;
        self.lines.push(command("begin", [DOCUMENT_ENVIRONMENT]));
        self.phase = Phase::Body;
        Ok(self)
    }

    /// Close the body. Fails while any scoped block is still open.
    pub fn end_document_body(&mut self) -> Result<&mut Self, LatexError> {
        self.require_phase(Phase::Body, "end of document body")?;
        if let Some(open) = self.open_blocks.last() {
            return Err(LatexError::Structure(format!(
                "cannot end document body while '{open}' is open"
            )));
        }
        self.lines.push(command("end", [DOCUMENT_ENVIRONMENT]));
        self.phase = Phase::Closed;
        Ok(self)
    }

    /// Open an environment. `parameters` is rendered as one extra argument,
    /// e.g. the column layout of a table.
    pub fn begin_scoped_block(
        &mut self,
        name: &str,
        parameters: Option<&str>,
    ) -> Result<&mut Self, LatexError> {
        self.require_phase(Phase::Body, "scoped block")?;
        if name.trim().is_empty() {
            return Err(LatexError::Structure(
                "environment name must not be empty".to_string(),
            ));
        }
        let mut line = command("begin", [name]);
        if let Some(parameters) = parameters {
            line.push_str(&format!("{{{parameters}}}"));
        }
        self.lines.push(line);
        self.open_blocks.push(name.to_string());
        Ok(self)
    }

    /// Close the innermost environment, which must be named `name`.
    pub fn end_scoped_block(&mut self, name: &str) -> Result<&mut Self, LatexError> {
        match self.open_blocks.last() {
            Some(open) if open == name => {
                self.open_blocks.pop();
                self.lines.push(command("end", [name]));
                Ok(self)
            }
            Some(open) => Err(LatexError::Structure(format!(
                "cannot end '{name}' while '{open}' is the innermost open block"
            ))),
            None => Err(LatexError::Structure(format!(
                "cannot end '{name}', no block is open"
            ))),
        }
    }

    /// Append one line verbatim.
    pub fn emit_line(&mut self, text: impl Into<String>) -> Result<&mut Self, LatexError> {
        self.require_open("line")?;
        self.lines.push(text.into());
        Ok(self)
    }

    /// Append one line built by replacing each `%` in `template`, left to
    /// right, with the next value. An escaped `\%` is kept as is.
    pub fn emit_formatted(
        &mut self,
        template: &str,
        values: &[&dyn Display],
    ) -> Result<&mut Self, LatexError> {
        self.require_open("formatted line")?;
        let line = fill_template(template, values)?;
        self.lines.push(line);
        Ok(self)
    }

    /// Append a block of lines without any transformation.
    pub fn emit_raw(&mut self, block: &str) -> Result<&mut Self, LatexError> {
        self.require_open("raw block")?;
        self.lines.push(block.to_string());
        Ok(self)
    }

    /// Environments opened but not yet closed, innermost last.
    pub fn open_blocks(&self) -> &[String] {
        &self.open_blocks
    }

    /// Join all content in insertion order.
    pub fn serialize(&self) -> Result<String, LatexError> {
        if let Some(open) = self.open_blocks.last() {
            return Err(LatexError::Structure(format!(
                "block '{open}' was never closed"
            )));
        }
        if self.phase != Phase::Closed {
            return Err(LatexError::Structure(
                "document body was never closed".to_string(),
            ));
        }
        debug!("Serializing LaTeX document with {} fragments", self.lines.len());
        Ok(self.lines.join("\n"))
    }

    fn require_phase(&self, expected: Phase, operation: &str) -> Result<(), LatexError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LatexError::Structure(format!(
                "{operation} is not allowed in {:?} phase",
                self.phase
            )))
        }
    }

    fn require_open(&self, operation: &str) -> Result<(), LatexError> {
        if self.phase == Phase::Closed {
            Err(LatexError::Structure(format!(
                "{operation} after the document body was closed"
            )))
        } else {
            Ok(())
        }
    }
}

fn fill_template(template: &str, values: &[&dyn Display]) -> Result<String, LatexError> {
    let placeholders = count_placeholders(template);
    if placeholders != values.len() {
        return Err(LatexError::FormatArity {
            template: template.to_string(),
            placeholders,
            values: values.len(),
        });
    }

    let mut filled = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut escaped = false;
    for c in template.chars() {
        if c == PLACEHOLDER && !escaped {
            if let Some(value) = values.next() {
                filled.push_str(&value.to_string());
            }
        } else {
            filled.push(c);
        }
        escaped = c == '\\' && !escaped;
    }
    Ok(filled)
}

fn count_placeholders(template: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in template.chars() {
        if c == PLACEHOLDER && !escaped {
            count += 1;
        }
        escaped = c == '\\' && !escaped;
    }
    count
}
