// Copyright 2023 Remi Bernotavicius

use super::catalog;
use super::form::FieldErrors;
use super::picker::{SelectedIngredient, SelectedIngredients};
use super::WriteError;
use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, NewRecipeIngredient, NewRecipeStep, Recipe, RecipeId,
    RecipeIngredient, RecipeRecord, RecipeStep, Unit, UnitId,
};
use diesel::prelude::Connection as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::GroupedBy as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashMap;

/// Number of step inputs a fresh recipe form starts with.
pub const STEP_SLOTS: usize = 10;

/// Highest step number the editor shows in its own slot.
pub const MAX_STEP_SLOTS: usize = 100;

pub struct RecipeLine {
    pub line: RecipeIngredient,
    pub ingredient: Ingredient,
    pub unit: Option<Unit>,
}

pub struct RecipeDetails {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeLine>,
    pub steps: Vec<RecipeStep>,
}

impl RecipeDetails {
    /// Steps in the order they are to be followed, whatever order they were stored in.
    pub fn sorted_steps(&self) -> Vec<&RecipeStep> {
        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.step_number);
        steps
    }
}

#[derive(Default)]
pub struct RecipeListing {
    pub recipes: Vec<RecipeDetails>,
    pub catalog: Vec<Ingredient>,
}

/// All recipes, newest first, with their ingredient lines and steps.
pub fn list_recipes(conn: &mut database::Connection) -> QueryResult<Vec<RecipeDetails>> {
    use database::schema::{ingredients, recipe_ingredients, recipe_steps, recipes};

    let all_recipes: Vec<Recipe> = recipes::table
        .select(Recipe::as_select())
        .order_by((recipes::created_at.desc(), recipes::id.desc()))
        .load(conn)?;

    let lines = RecipeIngredient::belonging_to(&all_recipes)
        .inner_join(ingredients::table)
        .select((RecipeIngredient::as_select(), Ingredient::as_select()))
        .order_by(recipe_ingredients::id.asc())
        .load::<(RecipeIngredient, Ingredient)>(conn)?
        .grouped_by(&all_recipes);

    let steps = RecipeStep::belonging_to(&all_recipes)
        .select(RecipeStep::as_select())
        .order_by(recipe_steps::id.asc())
        .load::<RecipeStep>(conn)?
        .grouped_by(&all_recipes);

    let units: HashMap<UnitId, Unit> = catalog::list_units(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(all_recipes
        .into_iter()
        .zip(lines)
        .zip(steps)
        .map(|((recipe, lines), steps)| RecipeDetails {
            recipe,
            ingredients: lines
                .into_iter()
                .map(|(line, ingredient)| RecipeLine {
                    unit: ingredient.unit_id.and_then(|u| units.get(&u).cloned()),
                    line,
                    ingredient,
                })
                .collect(),
            steps,
        })
        .collect())
}

/// Every ingredient, by name, for the picker.
pub fn ingredient_catalog(conn: &mut database::Connection) -> QueryResult<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .select(Ingredient::as_select())
        .order_by((name.asc(), id.asc()))
        .load(conn)
}

pub fn list(conn: &mut database::Connection) -> RecipeListing {
    let recipes = list_recipes(conn).unwrap_or_else(|e| {
        log::error!("error fetching recipes: {e}");
        vec![]
    });
    let catalog = ingredient_catalog(conn).unwrap_or_else(|e| {
        log::error!("error fetching ingredients: {e}");
        vec![]
    });
    RecipeListing { recipes, catalog }
}

/// One ingredient line of a recipe submission, as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientLine {
    pub ingredient_id: Option<IngredientId>,
    pub quantity: String,
}

/// One step of a recipe submission, as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct StepLine {
    pub step_number: String,
    pub description: String,
}

impl StepLine {
    pub fn new(step_number: i32, description: &str) -> Self {
        Self {
            step_number: step_number.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecipeInput {
    pub name: String,
    pub servings: i32,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<StepLine>,
}

fn ingredient_records(recipe_id: RecipeId, lines: &[IngredientLine]) -> Vec<NewRecipeIngredient> {
    lines
        .iter()
        .filter_map(|line| {
            let ingredient_id = line.ingredient_id?;
            let quantity = line.quantity.trim().parse::<f32>().ok()?;
            (quantity.is_finite() && quantity > 0.0).then_some(NewRecipeIngredient {
                recipe_id,
                ingredient_id,
                quantity,
            })
        })
        .collect()
}

fn step_records(recipe_id: RecipeId, steps: &[StepLine]) -> Vec<NewRecipeStep> {
    steps
        .iter()
        .filter(|s| !s.description.trim().is_empty())
        .filter_map(|s| match s.step_number.trim().parse() {
            Ok(step_number) => Some(NewRecipeStep {
                recipe_id,
                step_number,
                description: s.description.trim().into(),
            }),
            Err(e) => {
                log::warn!("dropping step with number {:?}: {e}", s.step_number);
                None
            }
        })
        .collect()
}

fn replace_recipe(
    conn: &mut database::Connection,
    input: &RecipeInput,
    existing: Option<RecipeId>,
) -> Result<RecipeId, WriteError> {
    use database::schema::{recipe_ingredients, recipe_steps, recipes};

    let record = RecipeRecord {
        name: input.name.trim().into(),
        servings: input.servings,
    };

    let saved_id = match existing {
        Some(edit_id) => {
            diesel::update(recipes::table)
                .filter(recipes::id.eq(edit_id))
                .set((&record, recipes::updated_at.eq(diesel::dsl::now)))
                .returning(recipes::id)
                .get_result::<RecipeId>(conn)
                .map_err(WriteError::UpdateRecipe)?;

            diesel::delete(recipe_ingredients::table)
                .filter(recipe_ingredients::recipe_id.eq(edit_id))
                .execute(conn)
                .map_err(WriteError::DeleteRecipeIngredients)?;
            diesel::delete(recipe_steps::table)
                .filter(recipe_steps::recipe_id.eq(edit_id))
                .execute(conn)
                .map_err(WriteError::DeleteRecipeSteps)?;
            edit_id
        }
        None => diesel::insert_into(recipes::table)
            .values(&record)
            .returning(recipes::id)
            .get_result::<RecipeId>(conn)
            .map_err(WriteError::InsertRecipe)?,
    };

    let new_ingredients = ingredient_records(saved_id, &input.ingredients);
    if !new_ingredients.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&new_ingredients)
            .execute(conn)
            .map_err(WriteError::InsertRecipeIngredients)?;
    }

    let new_steps = step_records(saved_id, &input.steps);
    if !new_steps.is_empty() {
        diesel::insert_into(recipe_steps::table)
            .values(&new_steps)
            .execute(conn)
            .map_err(WriteError::InsertRecipeSteps)?;
    }

    Ok(saved_id)
}

/// Writes the recipe (updating `existing` when given, inserting otherwise) and replaces all of
/// its ingredient lines and steps with those in `input`.
///
/// Lines without an ingredient or with a quantity that is not positive are dropped, as are steps
/// without a description. The whole save is one transaction: if any write fails it is logged and
/// the recipe is left as it was.
pub fn save(
    conn: &mut database::Connection,
    input: &RecipeInput,
    existing: Option<RecipeId>,
) -> Result<RecipeId, WriteError> {
    let saved_id = conn
        .transaction(|conn| replace_recipe(conn, input, existing))
        .inspect_err(|e| log::error!("error saving recipe {:?}: {e}", input.name))?;
    log::info!("saved recipe {saved_id} {:?}", input.name);
    Ok(saved_id)
}

/// The recipe editor's fields, as typed. Step `i` of `steps` is step number `i + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub servings: String,
    pub selected: SelectedIngredients,
    pub steps: Vec<String>,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            servings: "1".into(),
            selected: SelectedIngredients::default(),
            steps: vec![String::new(); STEP_SLOTS],
        }
    }
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_details(details: &RecipeDetails) -> Self {
        let selected = details
            .ingredients
            .iter()
            .map(|l| SelectedIngredient {
                ingredient: l.ingredient.clone(),
                quantity: l.line.quantity.to_string(),
            })
            .collect();

        // Steps keep their slot up to MAX_STEP_SLOTS, any further ones follow in order.
        let mut steps = vec![String::new(); STEP_SLOTS];
        for step in details.sorted_steps() {
            let slot = match usize::try_from(step.step_number) {
                Ok(n @ 1..=MAX_STEP_SLOTS) => n - 1,
                _ => steps.len(),
            };
            if slot >= steps.len() {
                steps.resize(slot + 1, String::new());
            }
            steps[slot] = step.description.clone();
        }

        Self {
            name: details.recipe.name.clone(),
            servings: details.recipe.servings.to_string(),
            selected: SelectedIngredients::new(selected),
            steps,
        }
    }

    pub fn add_step(&mut self) {
        self.steps.push(String::new());
    }

    pub fn validate(&self) -> Result<RecipeInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required_text("name", &self.name).to_owned();
        let servings = errors.required_at_least("servings", &self.servings, 1);
        for (i, s) in self.selected.iter().enumerate() {
            errors.required_at_least(format!("ingredients.{i}.quantity"), &s.quantity, 0.0f32);
        }
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, description)| StepLine::new(i as i32 + 1, description))
            .collect();

        errors.into_result(RecipeInput {
            name,
            servings: servings.unwrap_or(1),
            ingredients: self.selected.lines(),
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::form::REQUIRED;
    use crate::workflow::ingredient::{self, IngredientInput};
    use crate::workflow::picker::IngredientPicker;

    fn add_ingredient(conn: &mut database::Connection, name: &str) -> IngredientId {
        ingredient::save(conn, &IngredientInput::named(name), None, &[])
            .unwrap()
            .ingredient_id
    }

    fn line(ingredient_id: IngredientId, quantity: &str) -> IngredientLine {
        IngredientLine {
            ingredient_id: Some(ingredient_id),
            quantity: quantity.into(),
        }
    }

    fn input(name: &str, ingredients: Vec<IngredientLine>, steps: &[&str]) -> RecipeInput {
        RecipeInput {
            name: name.into(),
            servings: 2,
            ingredients,
            steps: steps
                .iter()
                .enumerate()
                .map(|(i, d)| StepLine::new(i as i32 + 1, d))
                .collect(),
        }
    }

    fn step_count(conn: &mut database::Connection, for_recipe: RecipeId) -> i64 {
        use database::schema::recipe_steps::dsl::*;

        recipe_steps
            .filter(recipe_id.eq(for_recipe))
            .count()
            .get_result(conn)
            .unwrap()
    }

    #[test]
    fn new_recipe_with_lines_and_steps() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");
        let water = add_ingredient(&mut conn, "Water");

        let id = save(
            &mut conn,
            &input(
                "Bread",
                vec![line(flour, "500"), line(water, "350")],
                &["Mix", "Knead", "", "Bake"],
            ),
            None,
        )
        .unwrap();

        let all = list_recipes(&mut conn).unwrap();
        assert_eq!(all.len(), 1);
        let bread = &all[0];
        assert_eq!(bread.recipe.id, id);
        assert_eq!(bread.recipe.name, "Bread");
        assert_eq!(bread.recipe.servings, 2);

        let lines: Vec<_> = bread
            .ingredients
            .iter()
            .map(|l| (l.ingredient.name.as_str(), l.line.quantity))
            .collect();
        assert_eq!(lines, [("Flour", 500.0), ("Water", 350.0)]);

        let steps: Vec<_> = bread
            .sorted_steps()
            .into_iter()
            .map(|s| (s.step_number, s.description.as_str()))
            .collect();
        assert_eq!(steps, [(1, "Mix"), (2, "Knead"), (4, "Bake")]);
    }

    #[test]
    fn edit_replaces_steps() {
        let mut conn = database::test_connection();
        let id = save(&mut conn, &input("Toast", vec![], &["a", "b", "c"]), None).unwrap();
        assert_eq!(step_count(&mut conn, id), 3);

        let saved = save(&mut conn, &input("Toast", vec![], &["a", "b", ""]), Some(id)).unwrap();
        assert_eq!(saved, id);
        assert_eq!(step_count(&mut conn, id), 2);
    }

    #[test]
    fn edit_replaces_ingredient_lines() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");
        let salt = add_ingredient(&mut conn, "Salt");

        let id = save(&mut conn, &input("Bread", vec![line(flour, "1")], &[]), None).unwrap();
        save(
            &mut conn,
            &input("Salted Bread", vec![line(salt, "2"), line(flour, "3")], &[]),
            Some(id),
        )
        .unwrap();

        let all = list_recipes(&mut conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].recipe.name, "Salted Bread");
        let lines: Vec<_> = all[0]
            .ingredients
            .iter()
            .map(|l| (l.line.ingredient_id, l.line.quantity))
            .collect();
        assert_eq!(lines, [(salt, 2.0), (flour, 3.0)]);
    }

    #[test]
    fn unusable_lines_dropped() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");
        let sugar = add_ingredient(&mut conn, "Sugar");

        let lines = vec![
            line(flour, "0"),
            IngredientLine {
                ingredient_id: None,
                quantity: "2".into(),
            },
            line(flour, ""),
            line(flour, "-1"),
            line(flour, "inf"),
            line(sugar, "3"),
        ];
        save(&mut conn, &input("Cake", lines, &[]), None).unwrap();

        let all = list_recipes(&mut conn).unwrap();
        let lines: Vec<_> = all[0]
            .ingredients
            .iter()
            .map(|l| (l.line.ingredient_id, l.line.quantity))
            .collect();
        assert_eq!(lines, [(sugar, 3.0)]);
    }

    #[test]
    fn steps_sorted_for_display() {
        let mut conn = database::test_connection();
        let steps = vec![
            StepLine::new(3, "third"),
            StepLine::new(1, "first"),
            StepLine::new(2, "second"),
            StepLine {
                step_number: "four".into(),
                description: "dropped".into(),
            },
        ];
        let recipe = RecipeInput {
            steps,
            ..input("Soup", vec![], &[])
        };
        save(&mut conn, &recipe, None).unwrap();

        let all = list_recipes(&mut conn).unwrap();
        let stored: Vec<_> = all[0].steps.iter().map(|s| s.step_number).collect();
        assert_eq!(stored, [3, 1, 2]);
        let shown: Vec<_> = all[0]
            .sorted_steps()
            .into_iter()
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(shown, ["first", "second", "third"]);
    }

    #[test]
    fn failed_insert_rolls_back_edit() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");
        let id = save(
            &mut conn,
            &input("Bread", vec![line(flour, "1")], &["Mix", "Bake"]),
            None,
        )
        .unwrap();

        // Two steps numbered 1 break the (recipe_id, step_number) uniqueness.
        let broken = RecipeInput {
            steps: vec![StepLine::new(1, "Mix"), StepLine::new(1, "Bake")],
            ..input("Renamed", vec![], &[])
        };
        let err = save(&mut conn, &broken, Some(id)).unwrap_err();
        assert!(matches!(err, WriteError::InsertRecipeSteps(_)), "{err}");

        let all = list_recipes(&mut conn).unwrap();
        assert_eq!(all[0].recipe.name, "Bread");
        assert_eq!(all[0].ingredients.len(), 1);
        assert_eq!(all[0].steps.len(), 2);
    }

    #[test]
    fn editing_missing_recipe_fails() {
        let mut conn = database::test_connection();
        let id = save(&mut conn, &input("Gone", vec![], &["a"]), None).unwrap();
        {
            use database::schema::recipes::dsl::*;
            diesel::delete(recipes).execute(&mut conn).unwrap();
        }

        let err = save(&mut conn, &input("Gone", vec![], &["a"]), Some(id)).unwrap_err();
        assert!(
            matches!(err, WriteError::UpdateRecipe(diesel::result::Error::NotFound)),
            "{err}"
        );
        assert!(list_recipes(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn unknown_ingredient_rolls_back_new_recipe() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");
        {
            use database::schema::ingredients::dsl::*;
            diesel::delete(ingredients).execute(&mut conn).unwrap();
        }

        let err = save(&mut conn, &input("Bread", vec![line(flour, "1")], &[]), None).unwrap_err();
        assert!(matches!(err, WriteError::InsertRecipeIngredients(_)), "{err}");
        assert!(list_recipes(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn newest_first() {
        let mut conn = database::test_connection();
        save(&mut conn, &input("Older", vec![], &[]), None).unwrap();
        save(&mut conn, &input("Newer", vec![], &[]), None).unwrap();

        let names: Vec<_> = list_recipes(&mut conn)
            .unwrap()
            .into_iter()
            .map(|r| r.recipe.name)
            .collect();
        assert_eq!(names, ["Newer", "Older"]);
    }

    #[test]
    fn catalog_by_name() {
        let mut conn = database::test_connection();
        add_ingredient(&mut conn, "Salt");
        add_ingredient(&mut conn, "Flour");
        add_ingredient(&mut conn, "Pepper");

        let listing = list(&mut conn);
        let names: Vec<_> = listing.catalog.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Flour", "Pepper", "Salt"]);
        assert!(listing.recipes.is_empty());
    }

    #[test]
    fn line_units_embedded() {
        let mut conn = database::test_connection();
        let g = catalog::list_units(&mut conn)
            .unwrap()
            .into_iter()
            .find(|u| u.name == "g")
            .unwrap();
        let flour = ingredient::save(
            &mut conn,
            &IngredientInput {
                unit_id: Some(g.id),
                ..IngredientInput::named("Flour")
            },
            None,
            &[],
        )
        .unwrap()
        .ingredient_id;
        let egg = add_ingredient(&mut conn, "Egg");

        save(
            &mut conn,
            &input("Pancakes", vec![line(flour, "200"), line(egg, "2")], &[]),
            None,
        )
        .unwrap();

        let all = list_recipes(&mut conn).unwrap();
        assert_eq!(all[0].ingredients[0].unit, Some(g));
        assert_eq!(all[0].ingredients[1].unit, None);
    }

    #[test]
    fn form_validation() {
        let form = RecipeForm {
            name: " ".into(),
            servings: "0".into(),
            ..RecipeForm::new()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert_eq!(errors.get("servings"), Some("Must be at least 1"));

        let form = RecipeForm {
            name: "Soup".into(),
            servings: "".into(),
            ..RecipeForm::new()
        };
        assert_eq!(form.validate().unwrap_err().get("servings"), Some(REQUIRED));
    }

    #[test]
    fn form_requires_quantities() {
        let mut conn = database::test_connection();
        add_ingredient(&mut conn, "Flour");
        let all = ingredient_catalog(&mut conn).unwrap();

        let mut form = RecipeForm {
            name: "Bread".into(),
            ..RecipeForm::new()
        };
        let mut picker = IngredientPicker::default();
        form.selected.select(&mut picker, &all[0]);
        form.selected.select(&mut picker, &all[0]);

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["ingredients.0.quantity", "ingredients.1.quantity"]
        );

        for s in form.selected.iter_mut() {
            s.quantity = "0".into();
        }
        let recipe = form.validate().unwrap();
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.steps.len(), STEP_SLOTS);
        assert_eq!(recipe.steps[9], StepLine::new(10, ""));

        // Zero quantities pass the form but are not stored.
        save(&mut conn, &recipe, None).unwrap();
        assert!(list_recipes(&mut conn).unwrap()[0].ingredients.is_empty());
    }

    #[test]
    fn form_from_saved_recipe() {
        let mut conn = database::test_connection();
        let flour = add_ingredient(&mut conn, "Flour");

        let mut steps: Vec<StepLine> = (1..=12).map(|n| StepLine::new(n, "")).collect();
        steps[0].description = "Mix".into();
        steps[11].description = "Rest".into();
        let recipe = RecipeInput {
            steps,
            ..input("Bread", vec![line(flour, "2.5"), line(flour, "1")], &[])
        };
        save(&mut conn, &recipe, None).unwrap();

        let all = list_recipes(&mut conn).unwrap();
        let form = RecipeForm::from_details(&all[0]);
        assert_eq!(form.name, "Bread");
        assert_eq!(form.servings, "2");
        let quantities: Vec<_> = form.selected.iter().map(|s| s.quantity.as_str()).collect();
        assert_eq!(quantities, ["2.5", "1"]);
        assert_eq!(form.steps.len(), 12);
        assert_eq!(form.steps[0], "Mix");
        assert_eq!(form.steps[11], "Rest");

        // Re-submitting unchanged keeps the recipe as it was.
        let id = all[0].recipe.id;
        save(&mut conn, &form.validate().unwrap(), Some(id)).unwrap();
        let again = list_recipes(&mut conn).unwrap();
        assert_eq!(again[0].ingredients.len(), 2);
        let numbers: Vec<_> = again[0].sorted_steps().iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, [1, 12]);
    }

    #[test]
    fn form_from_recipe_with_huge_step_number() {
        let mut conn = database::test_connection();
        let steps = [StepLine::new(2, "Mix"), StepLine::new(2_000_000_000, "Bake")];
        let recipe = RecipeInput {
            steps: steps.to_vec(),
            ..input("Bread", vec![], &[])
        };
        save(&mut conn, &recipe, None).unwrap();

        let form = RecipeForm::from_details(&list_recipes(&mut conn).unwrap()[0]);
        assert_eq!(form.steps.len(), STEP_SLOTS + 1);
        assert_eq!(form.steps[1], "Mix");
        assert_eq!(form.steps[STEP_SLOTS], "Bake");
    }
}
