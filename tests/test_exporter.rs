use async_trait::async_trait;
use chrono::NaiveDate;
use cookbook_tex::{
    Cookbook, CookbookError, CookbookExporter, CookbookStore, DocumentCompiler, EditorSession,
    ExportResult, Labels, RecipeDraft,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Records what it was asked to compile instead of running LaTeX.
struct RecordingCompiler {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl DocumentCompiler for RecordingCompiler {
    fn name(&self) -> &str {
        "recording"
    }

    async fn compile(&self, source: &str, job_name: &str) -> Result<PathBuf, CookbookError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), job_name.to_string()));
        Ok(PathBuf::from(format!("/virtual/{job_name}.pdf")))
    }
}

struct FailingCompiler;

#[async_trait]
impl DocumentCompiler for FailingCompiler {
    fn name(&self) -> &str {
        "failing"
    }

    async fn compile(&self, _source: &str, _job_name: &str) -> Result<PathBuf, CookbookError> {
        Err(CookbookError::Compile("! Undefined control sequence.".to_string()))
    }
}

fn session_cookbook() -> Cookbook {
    let mut session = EditorSession::new();
    session.name = "Weeknights".to_string();
    session.author = "Robin".to_string();

    let mut draft = RecipeDraft::new("Fried Rice");
    draft.group = "Mains".to_string();
    draft.duration = "25 min".to_string();
    draft.portions = "2".to_string();
    draft.steps = "Fry onions\nAdd rice\nSeason".to_string();
    draft.add_ingredient("Rice", "300g");
    draft.add_ingredient("Onion", "1");
    session.insert(draft);

    session.build().unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

#[tokio::test]
async fn test_latex_only_returns_source() {
    let result = CookbookExporter::builder()
        .cookbook(session_cookbook())
        .date(date())
        .latex_only()
        .build()
        .await
        .unwrap();

    match result {
        ExportResult::Latex(source) => {
            assert!(source.contains("\\section{Fried Rice}"));
            assert!(source.contains("Januar 2025"));
            assert!(source.contains("\\item Fry onions\n\\item Add rice\n\\item Season"));
        }
        ExportResult::Pdf(_) => panic!("Expected LaTeX result"),
    }
}

#[tokio::test]
async fn test_pdf_export_uses_compiler() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let compiler = RecordingCompiler {
        calls: Arc::clone(&calls),
    };

    let result = CookbookExporter::builder()
        .cookbook(session_cookbook())
        .date(date())
        .compiler(Box::new(compiler))
        .build()
        .await
        .unwrap();

    assert_eq!(result, ExportResult::Pdf(PathBuf::from("/virtual/cookbook.pdf")));
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "cookbook");
    assert!(calls[0].0.starts_with("\\documentclass"));
    assert!(calls[0].0.ends_with("\\end{document}"));
}

#[tokio::test]
async fn test_compiler_failure_propagates() {
    let err = CookbookExporter::builder()
        .cookbook(session_cookbook())
        .compiler(Box::new(FailingCompiler))
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, CookbookError::Compile(_)));
    assert!(!err.is_user_error());
}

#[tokio::test]
async fn test_export_from_store_with_labels() {
    let dir = tempfile::tempdir().unwrap();
    let store = CookbookStore::new(dir.path().join("cookBook.json"));
    store.save(&session_cookbook()).await.unwrap();

    let result = CookbookExporter::builder()
        .store(store)
        .labels(Labels::english())
        .locale(chrono::Locale::en_GB)
        .date(date())
        .latex_only()
        .build()
        .await
        .unwrap();

    let ExportResult::Latex(source) = result else {
        panic!("Expected LaTeX result");
    };
    assert!(source.contains("\\textit{Ingredients}:"));
    assert!(source.contains("January 2025"));
    assert!(source.contains("1 recipes in 1 categories"));
}

#[tokio::test]
async fn test_missing_source_is_builder_error() {
    let err = CookbookExporter::builder().latex_only().build().await.unwrap_err();
    assert!(matches!(err, CookbookError::Builder(_)));
}

#[tokio::test]
async fn test_invalid_cookbook_rejected_before_translation() {
    let mut cookbook = session_cookbook();
    cookbook.name = String::new();
    let err = CookbookExporter::builder()
        .cookbook(cookbook)
        .latex_only()
        .build()
        .await
        .unwrap_err();
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_concurrent_exports_are_independent() {
    let first = session_cookbook();
    let mut second = session_cookbook();
    second.name = "Weekends".to_string();

    let (a, b) = tokio::join!(
        CookbookExporter::builder()
            .cookbook(first)
            .date(date())
            .latex_only()
            .build(),
        CookbookExporter::builder()
            .cookbook(second)
            .date(date())
            .latex_only()
            .build(),
    );

    let (ExportResult::Latex(a), ExportResult::Latex(b)) = (a.unwrap(), b.unwrap()) else {
        panic!("Expected LaTeX results");
    };
    assert!(a.contains("\\title{Weeknights}"));
    assert!(b.contains("\\title{Weekends}"));
}

#[test]
fn test_render_convenience() {
    let source = cookbook_tex::render(&session_cookbook()).unwrap();
    assert!(source.contains("\\usepackage[ngerman]{babel}"));
}
