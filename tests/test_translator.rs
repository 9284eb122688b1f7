use chrono::NaiveDate;
use cookbook_tex::{Cookbook, CookbookTranslator, Ingredient, LatexDocument, LatexError, Recipe};
use std::collections::BTreeSet;

fn recipe(name: &str, group: &str, steps: &[&str], ingredients: &[(&str, &str)]) -> Recipe {
    Recipe {
        name: name.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        duration: format!("{} min", name.len() * 10),
        group: group.to_string(),
        number_of_portions: name.len() as u32,
        ingredients: ingredients
            .iter()
            .map(|(name, amount)| Ingredient::new(*name, *amount))
            .collect(),
    }
}

fn cookbook(recipes: Vec<Recipe>) -> Cookbook {
    Cookbook {
        name: "Omas Kochbuch".to_string(),
        author: "Oma".to_string(),
        recipes: recipes.into_iter().collect(),
    }
}

fn translator() -> CookbookTranslator {
    CookbookTranslator::new().with_date(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
}

fn render(cookbook: &Cookbook) -> String {
    translator().translate(cookbook).unwrap().serialize().unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in output"))
}

#[test]
fn test_output_is_deterministic() {
    let book = cookbook(vec![
        recipe("Soup", "Starters", &["Boil"], &[("Water", "1l")]),
        recipe("Cake", "Desserts", &["Bake"], &[("Flour", "200g")]),
    ]);
    assert_eq!(render(&book), render(&book.clone()));
}

#[test]
fn test_groups_and_recipes_sorted() {
    let book = cookbook(vec![
        recipe("Zucchini Soup", "Starters", &["Cook"], &[("Zucchini", "2")]),
        recipe("Apple Pie", "Desserts", &["Bake"], &[("Apples", "4")]),
        recipe("Bruschetta", "Starters", &["Toast"], &[("Bread", "1")]),
        recipe("Goulash", "Mains", &["Stew"], &[("Beef", "1kg")]),
        recipe("Affogato", "Desserts", &["Pour"], &[("Espresso", "1")]),
    ]);
    let out = render(&book);

    let chapters: Vec<usize> = ["\\chapter{Desserts}", "\\chapter{Mains}", "\\chapter{Starters}"]
        .iter()
        .map(|c| position(&out, c))
        .collect();
    assert!(chapters.windows(2).all(|w| w[0] < w[1]));

    let sections: Vec<usize> = [
        "\\section{Affogato}",
        "\\section{Apple Pie}",
        "\\section{Goulash}",
        "\\section{Bruschetta}",
        "\\section{Zucchini Soup}",
    ]
    .iter()
    .map(|s| position(&out, s))
    .collect();
    assert!(sections.windows(2).all(|w| w[0] < w[1]));
    assert!(position(&out, "\\chapter{Mains}") < position(&out, "\\section{Goulash}"));
}

#[test]
fn test_ordering_is_byte_wise() {
    let book = cookbook(vec![
        recipe("apple", "b", &["x"], &[("i", "1")]),
        recipe("Banana", "B", &["x"], &[("i", "1")]),
    ]);
    let out = render(&book);
    assert!(position(&out, "\\chapter{B}") < position(&out, "\\chapter{b}"));
}

#[test]
fn test_steps_keep_authored_order() {
    let book = cookbook(vec![recipe(
        "Pasta",
        "Mains",
        &["Chop", "Boil", "Serve"],
        &[("Pasta", "500g")],
    )]);
    let out = render(&book);
    assert!(out.contains(
        "\\begin{enumerate}\n\\item Chop\n\\item Boil\n\\item Serve\n\\end{enumerate}"
    ));
}

#[test]
fn test_ingredients_sorted_by_name() {
    let book = cookbook(vec![recipe(
        "Bread",
        "Baking",
        &["Knead"],
        &[("Salt", "1tsp"), ("Flour", "200g")],
    )]);
    let out = render(&book);
    assert!(position(&out, "200g & Flour\\\\") < position(&out, "1tsp & Salt\\\\"));
}

#[test]
fn test_same_ingredient_with_different_amounts_kept() {
    let book = cookbook(vec![recipe(
        "Brine",
        "Basics",
        &["Dissolve"],
        &[("Salt", "2tsp"), ("Salt", "1tsp")],
    )]);
    let out = render(&book);
    assert!(out.contains("1tsp & Salt\\\\\n2tsp & Salt\\\\"));
}

#[test]
fn test_title_counts() {
    let book = cookbook(vec![
        recipe("A", "One", &["s"], &[("i", "1")]),
        recipe("B", "One", &["s"], &[("i", "1")]),
        recipe("C", "Two", &["s"], &[("i", "1")]),
        recipe("D", "Two", &["s"], &[("i", "1")]),
        recipe("E", "Three", &["s"], &[("i", "1")]),
    ]);
    let out = render(&book);
    assert!(out.contains("\\Huge\n5 Rezepte aus 3 Kategorien\\\\"));
    assert!(out.contains("Oktober 2025"));
}

#[test]
fn test_desserts_scenario() {
    let cake = Recipe {
        name: "Cake".to_string(),
        steps: vec!["Bake the cake".to_string()],
        duration: "75 min".to_string(),
        group: "Desserts".to_string(),
        number_of_portions: 12,
        ingredients: BTreeSet::from([Ingredient::new("Butter", "250g")]),
    };
    let brownie = Recipe {
        name: "Brownie".to_string(),
        steps: vec!["Melt chocolate".to_string()],
        duration: "35 min".to_string(),
        group: "Desserts".to_string(),
        number_of_portions: 16,
        ingredients: BTreeSet::from([Ingredient::new("Chocolate", "200g")]),
    };
    let out = render(&cookbook(vec![cake, brownie]));

    assert_eq!(out.matches("\\chapter{").count(), 1);
    assert!(position(&out, "\\chapter{Desserts}") < position(&out, "\\section{Brownie}"));
    assert!(position(&out, "\\section{Brownie}") < position(&out, "\\section{Cake}"));
    for needle in ["Brownie", "Cake", "75 min", "35 min", ": 12\\\\", ": 16\\\\"] {
        assert_eq!(out.matches(needle).count(), 1, "'{needle}' should appear once");
    }
}

#[test]
fn test_blocks_balanced() {
    let book = cookbook(vec![
        recipe("A", "One", &["s", "t"], &[("i", "1"), ("j", "2")]),
        recipe("B", "Two", &["s"], &[("i", "1")]),
    ]);
    let out = render(&book);
    for block in ["document", "titlepage", "longtable", "enumerate", "center", "tikzpicture"] {
        let begins = out.matches(&format!("\\begin{{{block}}}")).count();
        let ends = out.matches(&format!("\\end{{{block}}}")).count();
        assert_eq!(begins, ends, "unbalanced {block}");
    }
    assert_eq!(out.matches("\\newpage").count(), 2);
}

#[test]
fn test_unclosed_block_fails_to_serialize() {
    let mut doc = LatexDocument::new("scrbook", "");
    doc.begin_document_body()
        .unwrap()
        .begin_scoped_block("enumerate", None)
        .unwrap();
    assert!(matches!(doc.serialize(), Err(LatexError::Structure(_))));
}

#[test]
fn test_user_text_is_not_escaped() {
    let book = cookbook(vec![recipe("Mac & Cheese", "Mains", &["Stir 100%"], &[("Cheese_", "1")])]);
    let out = render(&book);
    assert!(out.contains("\\section{Mac & Cheese}"));
    assert!(out.contains("\\item Stir 100%"));
    assert!(out.contains("1 & Cheese_\\\\"));
}
