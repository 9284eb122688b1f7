//! Append-only LaTeX document builder.
//!
//! The builder knows about commands, preamble packages and named
//! environments, but nothing about cookbooks. Text handed to it is emitted
//! verbatim: callers are responsible for escaping LaTeX control characters.

mod document;

use std::fmt::{Display, Write};
use thiserror::Error;

pub use document::LatexDocument;

/// Errors raised by [`LatexDocument`]. Both indicate a defect in the code
/// driving the builder, not bad user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatexError {
    /// Environments are unbalanced or the document lifecycle was violated
    #[error("Structure error: {0}")]
    Structure(String),

    /// A formatted line had a different number of placeholders than values
    #[error(
        "Template '{template}' has {placeholders} placeholder(s) but {values} value(s) were given"
    )]
    FormatArity {
        template: String,
        placeholders: usize,
        values: usize,
    },
}

/// Render a command with mandatory arguments, e.g. `\section{Cake}`.
///
/// ```
/// use cookbook_tex::latex::command;
///
/// assert_eq!(command("setlength", ["\\parindent", "0cm"]), "\\setlength{\\parindent}{0cm}");
/// assert_eq!(command("newpage", [""; 0]), "\\newpage");
/// ```
pub fn command<I, A>(name: &str, args: I) -> String
where
    I: IntoIterator<Item = A>,
    A: Display,
{
    let mut rendered = format!("\\{name}");
    for arg in args {
        // writing into a String cannot fail
        let _ = write!(rendered, "{{{arg}}}");
    }
    rendered
}
