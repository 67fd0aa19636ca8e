// Copyright 2023 Remi Bernotavicius

use super::catalog;
use super::form::FieldErrors;
use super::WriteError;
use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, IngredientPrice, IngredientRecord, Store, StoreId, Unit, UnitId,
};
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::GroupedBy as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::BTreeMap;

/// An ingredient together with its unit and its price at each store that has one.
#[derive(Clone, Debug, PartialEq)]
pub struct IngredientDetails {
    pub ingredient: Ingredient,
    pub unit: Option<Unit>,
    pub prices: Vec<(IngredientPrice, Store)>,
}

impl IngredientDetails {
    pub fn price_at(&self, store: StoreId) -> Option<f32> {
        self.prices
            .iter()
            .find(|(p, _)| p.store_id == store)
            .map(|(p, _)| p.price)
    }
}

/// Everything the ingredient editor shows.
#[derive(Clone, Debug, Default)]
pub struct IngredientListing {
    pub ingredients: Vec<IngredientDetails>,
    pub units: Vec<Unit>,
    pub stores: Vec<Store>,
}

pub fn list_ingredients(conn: &mut database::Connection) -> QueryResult<Vec<IngredientDetails>> {
    use database::schema::{ingredients, stores, units};

    let (all_ingredients, all_units): (Vec<Ingredient>, Vec<Option<Unit>>) = ingredients::table
        .left_join(units::table)
        .select((Ingredient::as_select(), Option::<Unit>::as_select()))
        .order_by(ingredients::id.asc())
        .load::<(Ingredient, Option<Unit>)>(conn)?
        .into_iter()
        .unzip();

    let prices = IngredientPrice::belonging_to(&all_ingredients)
        .inner_join(stores::table)
        .select((IngredientPrice::as_select(), Store::as_select()))
        .order_by(stores::name.asc())
        .load::<(IngredientPrice, Store)>(conn)?
        .grouped_by(&all_ingredients);

    Ok(all_ingredients
        .into_iter()
        .zip(all_units)
        .zip(prices)
        .map(|((ingredient, unit), prices)| IngredientDetails {
            ingredient,
            unit,
            prices,
        })
        .collect())
}

/// Loads the ingredients, units and stores. A failed fetch is logged and leaves that part empty,
/// the other parts are still loaded.
pub fn list(conn: &mut database::Connection) -> IngredientListing {
    let ingredients = list_ingredients(conn).unwrap_or_else(|e| {
        log::error!("error fetching ingredients: {e}");
        vec![]
    });
    let units = catalog::list_units(conn).unwrap_or_else(|e| {
        log::error!("error fetching units: {e}");
        vec![]
    });
    let stores = catalog::list_stores(conn).unwrap_or_else(|e| {
        log::error!("error fetching stores: {e}");
        vec![]
    });
    IngredientListing {
        ingredients,
        units,
        stores,
    }
}

/// A validated ingredient submission. Prices stay as typed; a blank price means "leave this
/// store alone".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientInput {
    pub name: String,
    pub image_url: String,
    pub unit_id: Option<UnitId>,
    pub calories: Option<f32>,
    pub protein: Option<f32>,
    pub carbs: Option<f32>,
    pub fat: Option<f32>,
    pub prices: BTreeMap<StoreId, String>,
}

impl IngredientInput {
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn to_record(&self) -> IngredientRecord {
        let image_url = self.image_url.trim();
        IngredientRecord {
            name: self.name.trim().into(),
            image_url: (!image_url.is_empty()).then(|| image_url.into()),
            unit_id: self.unit_id,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// The ingredient editor's fields, as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientForm {
    pub name: String,
    pub image_url: String,
    pub unit_id: Option<UnitId>,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub prices: BTreeMap<StoreId, String>,
}

fn number_text(n: Option<f32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

impl IngredientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_details(details: &IngredientDetails) -> Self {
        let i = &details.ingredient;
        Self {
            name: i.name.clone(),
            image_url: i.image_url.clone().unwrap_or_default(),
            unit_id: i.unit_id,
            calories: number_text(i.calories),
            protein: number_text(i.protein),
            carbs: number_text(i.carbs),
            fat: number_text(i.fat),
            prices: details
                .prices
                .iter()
                .map(|(p, _)| (p.store_id, p.price.to_string()))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<IngredientInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required_text("name", &self.name).to_owned();
        let calories = errors.optional_at_least("calories", &self.calories, 0.0);
        let protein = errors.optional_at_least("protein", &self.protein, 0.0);
        let carbs = errors.optional_at_least("carbs", &self.carbs, 0.0);
        let fat = errors.optional_at_least("fat", &self.fat, 0.0);
        for (store, price) in &self.prices {
            errors.optional_at_least(format!("prices.{store}"), price, 0.0f32);
        }
        errors.into_result(IngredientInput {
            name,
            image_url: self.image_url.trim().into(),
            unit_id: self.unit_id,
            calories,
            protein,
            carbs,
            fat,
            prices: self.prices.clone(),
        })
    }
}

/// The result of an ingredient save whose ingredient row was written.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveOutcome {
    pub ingredient_id: IngredientId,
    /// Stores whose price could not be written. Each failure has already been logged.
    pub failed_stores: Vec<StoreId>,
}

fn write_ingredient(
    conn: &mut database::Connection,
    record: &IngredientRecord,
    existing: Option<IngredientId>,
) -> Result<IngredientId, WriteError> {
    use database::schema::ingredients::dsl::*;

    match existing {
        Some(edit_id) => diesel::update(ingredients)
            .filter(id.eq(edit_id))
            .set((record, updated_at.eq(diesel::dsl::now)))
            .returning(id)
            .get_result(conn)
            .map_err(WriteError::UpdateIngredient),
        None => diesel::insert_into(ingredients)
            .values(record)
            .returning(id)
            .get_result(conn)
            .map_err(WriteError::InsertIngredient),
    }
}

/// Inserts the price for (`for_ingredient`, `at_store`), or overwrites it if one exists.
pub fn upsert_price(
    conn: &mut database::Connection,
    for_ingredient: IngredientId,
    at_store: StoreId,
    new_price: f32,
) -> QueryResult<()> {
    use database::schema::ingredient_prices::dsl::*;

    diesel::insert_into(ingredient_prices)
        .values((
            ingredient_id.eq(for_ingredient),
            store_id.eq(at_store),
            price.eq(new_price),
        ))
        .on_conflict((ingredient_id, store_id))
        .do_update()
        .set((price.eq(new_price), updated_at.eq(diesel::dsl::now)))
        .execute(conn)?;
    Ok(())
}

/// Writes the ingredient (updating `existing` when given, inserting otherwise) and then the
/// price for every store in `stores` that has a non-blank price in the input.
///
/// Price writes are independent of each other and of the ingredient row: a failing store is
/// logged and skipped, nothing is rolled back. Only a failure to write the ingredient itself
/// stops the save.
pub fn save(
    conn: &mut database::Connection,
    input: &IngredientInput,
    existing: Option<IngredientId>,
    stores: &[Store],
) -> Result<SaveOutcome, WriteError> {
    let ingredient_id = write_ingredient(conn, &input.to_record(), existing).inspect_err(|e| {
        log::error!("error saving ingredient {:?}: {e}", input.name);
    })?;

    let mut failed_stores = vec![];
    for store in stores {
        let Some(text) = input.prices.get(&store.id) else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let result = match text.parse::<f32>() {
            Ok(new_price) if new_price.is_finite() => {
                upsert_price(conn, ingredient_id, store.id, new_price).map_err(|e| e.to_string())
            }
            Ok(_) => Err(format!("invalid price {text:?}: not a finite number")),
            Err(e) => Err(format!("invalid price {text:?}: {e}")),
        };
        if let Err(e) = result {
            log::error!(
                "error updating price of ingredient {ingredient_id} at {:?}: {e}",
                store.name
            );
            failed_stores.push(store.id);
        }
    }

    log::info!("saved ingredient {ingredient_id} {:?}", input.name);
    Ok(SaveOutcome {
        ingredient_id,
        failed_stores,
    })
}
