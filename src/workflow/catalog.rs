// Copyright 2023 Remi Bernotavicius

//! Units and stores. Ingredients reference them but neither editor creates them, so they are
//! managed separately.

use super::WriteError;
use crate::database;
use crate::database::models::{Store, StoreId, Unit, UnitId};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

pub fn list_units(conn: &mut database::Connection) -> QueryResult<Vec<Unit>> {
    use database::schema::units::dsl::*;

    units
        .select(Unit::as_select())
        .order_by((name.asc(), id.asc()))
        .load(conn)
}

pub fn list_stores(conn: &mut database::Connection) -> QueryResult<Vec<Store>> {
    use database::schema::stores::dsl::*;

    stores
        .select(Store::as_select())
        .order_by((name.asc(), id.asc()))
        .load(conn)
}

pub fn add_unit(conn: &mut database::Connection, new_name: &str) -> Result<UnitId, WriteError> {
    use database::schema::units::dsl::*;

    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(WriteError::InvalidName(new_name.into()));
    }
    diesel::insert_into(units)
        .values(name.eq(new_name))
        .returning(id)
        .get_result(conn)
        .map_err(WriteError::Database)
}

pub fn add_store(conn: &mut database::Connection, new_name: &str) -> Result<StoreId, WriteError> {
    use database::schema::stores::dsl::*;

    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(WriteError::InvalidName(new_name.into()));
    }
    diesel::insert_into(stores)
        .values(name.eq(new_name))
        .returning(id)
        .get_result(conn)
        .map_err(WriteError::Database)
}

#[test]
fn stores_listed_by_name() {
    let mut conn = database::test_connection();
    let b = add_store(&mut conn, "Bakery").unwrap();
    let a = add_store(&mut conn, " Aldi ").unwrap();

    let all = list_stores(&mut conn).unwrap();
    assert_eq!(
        all,
        [
            Store {
                id: a,
                name: "Aldi".into()
            },
            Store {
                id: b,
                name: "Bakery".into()
            },
        ]
    );
}

#[test]
fn blank_names_rejected() {
    let mut conn = database::test_connection();
    assert!(matches!(
        add_store(&mut conn, "  "),
        Err(WriteError::InvalidName(_))
    ));
    assert!(matches!(
        add_unit(&mut conn, ""),
        Err(WriteError::InvalidName(_))
    ));
    assert!(list_stores(&mut conn).unwrap().is_empty());
}

#[test]
fn units_include_added() {
    let mut conn = database::test_connection();
    let cup = add_unit(&mut conn, "cup").unwrap();

    let all = list_units(&mut conn).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].name, "cup");
    assert_eq!(all[0].id, cup);
}
