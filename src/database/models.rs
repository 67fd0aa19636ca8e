// Copyright 2023 Remi Bernotavicius

use crate::database::schema::{
    ingredient_prices, ingredients, recipe_ingredients, recipe_steps, recipes, stores, units,
};
use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::{AsChangeset, Insertable};
use diesel_derive_newtype::DieselNewType;

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct UnitId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = units)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct StoreId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = stores)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_id: Option<UnitId>,
    pub calories: Option<f32>,
    pub protein: Option<f32>,
    pub carbs: Option<f32>,
    pub fat: Option<f32>,
}

/// The writable columns of an ingredient row. Used both to insert a new ingredient and to
/// overwrite an existing one, in which case `None` clears the column.
#[derive(Insertable, AsChangeset, Clone, Debug, PartialEq)]
#[diesel(table_name = ingredients)]
#[diesel(treat_none_as_null = true)]
pub struct IngredientRecord {
    pub name: String,
    pub image_url: Option<String>,
    pub unit_id: Option<UnitId>,
    pub calories: Option<f32>,
    pub protein: Option<f32>,
    pub carbs: Option<f32>,
    pub fat: Option<f32>,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientPriceId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Ingredient))]
#[diesel(belongs_to(Store))]
#[diesel(table_name = ingredient_prices)]
pub struct IngredientPrice {
    pub id: IngredientPriceId,
    pub ingredient_id: IngredientId,
    pub store_id: StoreId,
    pub price: f32,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub servings: i32,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone, Debug, PartialEq)]
#[diesel(table_name = recipes)]
pub struct RecipeRecord {
    pub name: String,
    pub servings: i32,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeIngredientId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(table_name = recipe_ingredients)]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f32,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f32,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeStepId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = recipe_steps)]
pub struct RecipeStep {
    pub id: RecipeStepId,
    pub recipe_id: RecipeId,
    pub step_number: i32,
    pub description: String,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name = recipe_steps)]
pub struct NewRecipeStep {
    pub recipe_id: RecipeId,
    pub step_number: i32,
    pub description: String,
}
