// Copyright 2023 Remi Bernotavicius

//! The ingredient autocomplete used by the recipe editor, and the list of ingredients picked
//! with it so far.

use super::recipe::IngredientLine;
use crate::database::models::Ingredient;

/// Case-insensitive substring match of `term` against ingredient names, in catalog order.
pub fn filter<'a>(catalog: &'a [Ingredient], term: &str) -> Vec<&'a Ingredient> {
    let term = term.to_lowercase();
    catalog
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&term))
        .collect()
}

#[derive(Default, Debug, Clone)]
pub struct IngredientPicker {
    pub search_term: String,
}

impl IngredientPicker {
    /// Matches are only offered once something has been typed.
    pub fn is_open(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn matches<'a>(&self, catalog: &'a [Ingredient]) -> Vec<&'a Ingredient> {
        if !self.is_open() {
            return vec![];
        }
        filter(catalog, &self.search_term)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedIngredient {
    pub ingredient: Ingredient,
    pub quantity: String,
}

/// Ingredients picked for the recipe being edited. Entries are bound to their quantity input by
/// position, so the same ingredient may appear more than once.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SelectedIngredients(Vec<SelectedIngredient>);

impl SelectedIngredients {
    pub fn new(selected: Vec<SelectedIngredient>) -> Self {
        Self(selected)
    }

    /// Appends `ingredient` with an empty quantity and resets the search.
    pub fn select(&mut self, picker: &mut IngredientPicker, ingredient: &Ingredient) {
        self.0.push(SelectedIngredient {
            ingredient: ingredient.clone(),
            quantity: String::new(),
        });
        picker.search_term.clear();
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.0.len() {
            self.0.remove(index);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedIngredient> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SelectedIngredient> {
        self.0.iter_mut()
    }

    pub fn lines(&self) -> Vec<IngredientLine> {
        self.0
            .iter()
            .map(|s| IngredientLine {
                ingredient_id: Some(s.ingredient.id),
                quantity: s.quantity.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
fn catalog(conn: &mut crate::database::Connection, names: &[&str]) -> Vec<Ingredient> {
    use super::ingredient::{self, IngredientInput};

    for name in names {
        ingredient::save(conn, &IngredientInput::named(name), None, &[]).unwrap();
    }
    super::recipe::ingredient_catalog(conn).unwrap()
}

#[test]
fn filter_is_case_insensitive_substring() {
    let mut conn = crate::database::test_connection();
    let all = catalog(&mut conn, &["Brown Sugar", "Flour", "sugar", "Salt"]);

    let names = |found: Vec<&Ingredient>| found.into_iter().map(|i| i.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(filter(&all, "SUG")), ["Brown Sugar", "sugar"]);
    assert_eq!(names(filter(&all, "our")), ["Flour"]);
    assert!(filter(&all, "pepper").is_empty());
    assert_eq!(filter(&all, "").len(), 4);
}

#[test]
fn picker_closed_until_typed() {
    let mut conn = crate::database::test_connection();
    let all = catalog(&mut conn, &["Flour"]);

    let mut picker = IngredientPicker::default();
    assert!(!picker.is_open());
    assert!(picker.matches(&all).is_empty());

    picker.search_term = "f".into();
    assert_eq!(picker.matches(&all).len(), 1);
}

#[test]
fn selecting_twice_gives_independent_lines() {
    let mut conn = crate::database::test_connection();
    let all = catalog(&mut conn, &["Flour"]);
    let flour = &all[0];

    let mut picker = IngredientPicker {
        search_term: "fl".into(),
    };
    let mut selected = SelectedIngredients::default();
    selected.select(&mut picker, flour);
    assert_eq!(picker.search_term, "");

    picker.search_term = "fl".into();
    selected.select(&mut picker, flour);
    assert_eq!(selected.len(), 2);

    for (s, q) in selected.iter_mut().zip(["100", "250"]) {
        s.quantity = q.into();
    }
    assert_eq!(
        selected.lines(),
        [
            IngredientLine {
                ingredient_id: Some(flour.id),
                quantity: "100".into()
            },
            IngredientLine {
                ingredient_id: Some(flour.id),
                quantity: "250".into()
            },
        ]
    );

    selected.remove(0);
    selected.remove(5);
    assert_eq!(selected.lines()[0].quantity, "250");
}
