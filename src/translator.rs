//! Projects a [`Cookbook`] onto a [`LatexDocument`].
//!
//! The layout is fixed: preamble, title page, table of contents, then one
//! chapter per group (ascending by name) with one section per recipe
//! (ascending by name). Output depends only on the cookbook, the labels, the
//! locale and the date, so two translations of the same input with a pinned
//! date are byte-identical.

use chrono::{Local, Locale, NaiveDate};
use log::debug;
use serde::Deserialize;

use crate::latex::{command, LatexDocument, LatexError};
use crate::model::{group_by, Cookbook, Recipe};

const DOCUMENT_CLASS: &str = "scrbook";
const DOCUMENT_CLASS_OPTIONS: &str = "12pt, headings=big";
const INGREDIENT_TABLE: &str = "longtable";
const INGREDIENT_COLUMNS: &str = "@{}rl@{}";
const STEP_LIST: &str = "enumerate";
const TITLE_PAGE: &str = "titlepage";

const CHAPTER_STYLE: &str = r"\setkomafont{chapter}{\fontsize{50}{60}\selectfont\fontfamily{pzc}\selectfont}
\renewcommand*{\chapterformat}{%
\centering\chaptername~\thechapter\par\vspace{0.1cm}%
}
\renewcommand*{\chapterlinesformat}[3]{%
\centering #2#3%
}";

const CUTLERY_DRAWING: &str = r"\begin{tikzpicture}[scale=2]
\def\handleLeft{1.4}
\def\handleRight{1.6}
\pgfmathsetmacro{\handleCenter}{(\handleLeft + \handleRight)/2}
% spoon
\pgfmathsetmacro{\spoonShiftX}{1.8}
\def\spoonHandleBottom{-0.1}
\def\spoonHandleTop{3}
\fill[gray!30]
  (\handleLeft + \spoonShiftX, \spoonHandleBottom) rectangle (\handleRight + \spoonShiftX, \spoonHandleTop);
\fill[gray!50]
  ([shift={(\handleCenter + \spoonShiftX, 3)}]0,0) ellipse (0.5cm and 0.7cm);
% knife
\pgfmathsetmacro{\knifeShiftX}{3}
\def\knifeHandleBottom{1.35}
\def\knifeHandleTop{-0.1}
\fill[gray!30]
  (\handleLeft + \knifeShiftX, \knifeHandleBottom + 0.3) rectangle (\handleRight + \knifeShiftX, \knifeHandleTop);
\fill[gray!60,rounded corners=2pt]
  ([shift={(\handleCenter + \knifeShiftX, \knifeHandleBottom + 0.3)}] -0.15,0) --
  ++(0.3,0) -- ++(0,2.0) -- ++(-0.3,0) -- cycle;
\fill[gray!60]
  ([shift={(\handleCenter + \knifeShiftX - 0.1, \knifeHandleBottom + 1.3)}]0,0) ellipse (0.15cm and 1.0cm);
\end{tikzpicture}";

const SEPARATOR: &str = r"\begin{center}
\begin{tikzpicture}
\draw (-4,0) -- (-0.9,0);
\draw (0.9,0) -- (4,0);
\node at (0,0) {
\begin{tikzpicture}[scale=0.12]
\foreach \angle in {45, 135, 225, 315} {
\draw[draw=none, fill=green!60!black] (0,0) ++(\angle:1.0) circle (0.75);
}
\fill[draw=none, fill=green!70!black] (0,0) circle (0.25);
\end{tikzpicture}
};
\end{tikzpicture}
\end{center}";

/// Fixed texts printed around the cookbook data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Language option passed to babel
    pub language: String,
    pub by_author: String,
    /// Title page summary; the first `%` is the recipe count, the second the group count
    pub summary: String,
    pub duration: String,
    pub portions: String,
    pub ingredients: String,
    pub continued: String,
    pub steps: String,
}

impl Labels {
    pub fn german() -> Self {
        Labels {
            language: "ngerman".to_string(),
            by_author: "von".to_string(),
            summary: "% Rezepte aus % Kategorien".to_string(),
            duration: "Zubereitungsdauer".to_string(),
            portions: "Portionen".to_string(),
            ingredients: "Zutaten".to_string(),
            continued: "Weiter auf nächster Seite".to_string(),
            steps: "Zubereitungsschritte".to_string(),
        }
    }

    pub fn english() -> Self {
        Labels {
            language: "english".to_string(),
            by_author: "by".to_string(),
            summary: "% recipes in % categories".to_string(),
            duration: "Duration".to_string(),
            portions: "Portions".to_string(),
            ingredients: "Ingredients".to_string(),
            continued: "Continued on next page".to_string(),
            steps: "Steps".to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels::german()
    }
}

/// Translates cookbooks into LaTeX documents.
#[derive(Debug, Clone)]
pub struct CookbookTranslator {
    labels: Labels,
    locale: Locale,
    date: Option<NaiveDate>,
}

impl Default for CookbookTranslator {
    fn default() -> Self {
        CookbookTranslator {
            labels: Labels::default(),
            locale: Locale::de_DE,
            date: None,
        }
    }
}

impl CookbookTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Locale used to spell the month on the title page.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Print this date instead of today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Build the full document for `cookbook`.
    ///
    /// The cookbook is expected to be valid already; it is not checked again.
    /// Any error returned is a defect in the translation itself.
    pub fn translate(&self, cookbook: &Cookbook) -> Result<LatexDocument, LatexError> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut translation = Translation {
            doc: LatexDocument::new(DOCUMENT_CLASS, DOCUMENT_CLASS_OPTIONS),
            cookbook,
            labels: &self.labels,
            date: date.format_localized("%B %Y", self.locale).to_string(),
        };
        translation.add_preamble()?;
        translation.doc.begin_document_body()?;
        translation.add_title_page()?;
        translation.add_recipes()?;
        translation.doc.end_document_body()?;
        Ok(translation.doc)
    }
}

struct Translation<'a> {
    doc: LatexDocument,
    cookbook: &'a Cookbook,
    labels: &'a Labels,
    date: String,
}

impl Translation<'_> {
    fn add_preamble(&mut self) -> Result<(), LatexError> {
        self.doc
            .declare_preamble_option("babel", Some(self.labels.language.as_str()))?
            .declare_preamble_option("fontenc", Some("T1"))?
            .declare_preamble_option("lmodern", None)?
            .declare_preamble_option("enumitem", None)?
            .declare_preamble_option("makecell", None)?
            .declare_preamble_option("tikz", None)?
            .declare_preamble_option("longtable", None)?
            .declare_preamble_option("graphicx", None)?
            .set_title_metadata(&self.cookbook.name, &self.cookbook.author)?
            .emit_line(command("setlength", ["\\parindent", "0cm"]))?
            .emit_raw(CHAPTER_STYLE)?
            .emit_line(command(
                "renewcommand*",
                ["\\chapterheadstartvskip", command("vspace*", ["0cm"]).as_str()],
            ))?;
        Ok(())
    }

    fn add_title_page(&mut self) -> Result<(), LatexError> {
        let recipe_count = self.cookbook.recipes.len();
        let group_count = self.cookbook.group_count();
        debug!(
            "Title page for '{}': {} recipes in {} groups",
            self.cookbook.name, recipe_count, group_count
        );
        let summary = format!("{}\\\\", self.labels.summary);

        self.doc
            .emit_line(command("frontmatter", NO_ARGS))?
            .begin_scoped_block(TITLE_PAGE, None)?
            .emit_line(command("centering", NO_ARGS))?
            .emit_line("\\fontsize{70}{84}\\selectfont")?
            .emit_line("\\fontfamily{pzc}\\selectfont")?
            .emit_formatted("%\\\\", &[&self.cookbook.name])?
            .emit_line(command("vspace", ["0.8cm"]))?
            .emit_line("\\normalfont\\selectfont")?
            .emit_line(command("Large", NO_ARGS))?
            .emit_formatted("%\\\\", &[&self.labels.by_author])?
            .emit_formatted("%\\\\", &[&self.cookbook.author])?
            .emit_line(command("vspace", ["4cm"]))?
            .emit_line(command("Huge", NO_ARGS))?
            .emit_formatted(&summary, &[&recipe_count, &group_count])?
            .emit_line(command("vfill", NO_ARGS))?
            .emit_raw(CUTLERY_DRAWING)?
            .emit_line(command("vfill", NO_ARGS))?
            .emit_line(command("Large", NO_ARGS))?
            .emit_formatted("%", &[&self.date])?
            .end_scoped_block(TITLE_PAGE)?
            .emit_line(command("tableofcontents", NO_ARGS))?
            .emit_line(command("mainmatter", NO_ARGS))?;
        Ok(())
    }

    fn add_recipes(&mut self) -> Result<(), LatexError> {
        let cookbook = self.cookbook;
        for (group, mut recipes) in group_by(&cookbook.recipes) {
            // full comparison breaks ties between recipes sharing a name
            recipes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
            self.doc.emit_line(command("chapter", [group]))?;
            for recipe in recipes {
                self.add_recipe(recipe)?;
            }
        }
        Ok(())
    }

    fn add_recipe(&mut self, recipe: &Recipe) -> Result<(), LatexError> {
        let labels = self.labels;
        let continued = command(
            "multicolumn",
            ["2", "r", command("textit", [&labels.continued]).as_str()],
        );

        self.doc
            .emit_line(command("section", [&recipe.name]))?
            .emit_formatted(
                "%: %\\\\",
                &[&command("textit", [&labels.duration]), &recipe.duration],
            )?
            .emit_formatted(
                "%: %\\\\",
                &[&command("textit", [&labels.portions]), &recipe.number_of_portions],
            )?
            .emit_formatted("%:", &[&command("textit", [&labels.ingredients])])?
            .begin_scoped_block(INGREDIENT_TABLE, Some(INGREDIENT_COLUMNS))?
            .emit_line(command("hline", NO_ARGS))?
            .emit_formatted("%\\\\", &[&continued])?
            .emit_line(command("endfoot", NO_ARGS))?
            .emit_line(command("endlastfoot", NO_ARGS))?;

        // the set is ordered by name
        for ingredient in &recipe.ingredients {
            self.doc
                .emit_formatted("% & %\\\\", &[&ingredient.amount, &ingredient.name])?;
        }

        self.doc
            .end_scoped_block(INGREDIENT_TABLE)?
            .emit_raw(SEPARATOR)?
            .emit_line(command("textit", [&labels.steps]))?
            .begin_scoped_block(STEP_LIST, None)?;

        for step in &recipe.steps {
            self.doc
                .emit_formatted("% %", &[&command("item", NO_ARGS), step])?;
        }

        self.doc
            .end_scoped_block(STEP_LIST)?
            .emit_line(command("newpage", NO_ARGS))?;
        Ok(())
    }
}

const NO_ARGS: [&str; 0] = [];
