// Copyright 2023 Remi Bernotavicius

//! The reads and writes behind the ingredient and recipe editors. Everything in here works on a
//! plain [`database::Connection`](crate::database::Connection) so it can be driven from the UI,
//! from the command line, or from tests against an in-memory database.

use derive_more::{Display, Error};

pub mod catalog;
pub mod form;
pub mod ingredient;
pub mod picker;
pub mod recipe;

/// A failed write, tagged with the step of the save that issued it.
#[derive(Debug, Display, Error)]
pub enum WriteError {
    #[display("invalid name {_0:?}")]
    InvalidName(#[error(not(source))] String),
    #[display("failed to insert ingredient: {_0}")]
    InsertIngredient(#[error(source)] diesel::result::Error),
    #[display("failed to update ingredient: {_0}")]
    UpdateIngredient(#[error(source)] diesel::result::Error),
    #[display("failed to insert recipe: {_0}")]
    InsertRecipe(#[error(source)] diesel::result::Error),
    #[display("failed to update recipe: {_0}")]
    UpdateRecipe(#[error(source)] diesel::result::Error),
    #[display("failed to delete recipe ingredients: {_0}")]
    DeleteRecipeIngredients(#[error(source)] diesel::result::Error),
    #[display("failed to delete recipe steps: {_0}")]
    DeleteRecipeSteps(#[error(source)] diesel::result::Error),
    #[display("failed to add recipe ingredients: {_0}")]
    InsertRecipeIngredients(#[error(source)] diesel::result::Error),
    #[display("failed to add recipe steps: {_0}")]
    InsertRecipeSteps(#[error(source)] diesel::result::Error),
    #[display("{_0}")]
    Database(#[error(source)] diesel::result::Error),
}

// Needed by `Connection::transaction`, which reports commit and rollback failures through the
// closure's error type.
impl From<diesel::result::Error> for WriteError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Database(e)
    }
}
