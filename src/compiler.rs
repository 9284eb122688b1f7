use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;

use crate::config::LatexConfig;
use crate::error::CookbookError;

/// Number of trailing output lines kept in a compile error.
const LOG_TAIL_LINES: usize = 20;

/// Turns serialized LaTeX into a viewable document.
#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    fn name(&self) -> &str;

    /// Compile `source` and return the path of the produced file.
    async fn compile(&self, source: &str, job_name: &str) -> Result<PathBuf, CookbookError>;
}

/// Runs an external LaTeX engine such as `pdflatex`.
pub struct LatexCompiler {
    program: String,
    args: Vec<String>,
    passes: u32,
    output_dir: PathBuf,
}

impl LatexCompiler {
    /// Create a compiler from configuration
    pub fn new(config: &LatexConfig) -> Self {
        LatexCompiler {
            program: config.program.clone(),
            args: config.args.clone(),
            passes: config.passes.max(1),
            output_dir: config.output_dir.clone(),
        }
    }

    #[doc(hidden)]
    pub fn with_program(program: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        LatexCompiler {
            program: program.into(),
            args: Vec::new(),
            passes: 1,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn run_pass(&self, tex_file: &Path, pass: u32) -> Result<(), CookbookError> {
        debug!(
            "Running {} pass {}/{} on {}",
            self.program,
            pass,
            self.passes,
            tex_file.display()
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(format!("-output-directory={}", self.output_dir.display()))
            .arg(tex_file)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                CookbookError::Compile(format!("could not start '{}': {}", self.program, e))
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("{} failed with {}", self.program, output.status);
        Err(CookbookError::Compile(format!(
            "'{}' exited with {}:\n{}",
            self.program,
            output.status,
            tail(&format!("{stdout}{stderr}"), LOG_TAIL_LINES)
        )))
    }
}

#[async_trait]
impl DocumentCompiler for LatexCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    async fn compile(&self, source: &str, job_name: &str) -> Result<PathBuf, CookbookError> {
        fs::create_dir_all(&self.output_dir).await?;
        let tex_file = self.output_dir.join(format!("{job_name}.tex"));
        fs::write(&tex_file, source).await?;

        // later passes resolve the table of contents
        for pass in 1..=self.passes {
            self.run_pass(&tex_file, pass).await?;
        }

        let pdf = self.output_dir.join(format!("{job_name}.pdf"));
        info!("Compiled {}", pdf.display());
        Ok(pdf)
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
