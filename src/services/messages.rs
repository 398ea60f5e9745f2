use actix::Message;
use diesel::QueryResult;

use crate::services::db_models::Cafe;
use crate::services::insertable::CafeForm;

/// Every cafe, ordered by `coffee_price` compared as text.
#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Cafe>>")]
pub struct FetchCafes;

#[derive(Message)]
#[rtype(result = "QueryResult<Option<Cafe>>")]
pub struct FetchRandomCafe;

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Cafe>>")]
pub struct FindCafesByLocation(pub String);

#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct AddCafe(pub CafeForm);

/// Resolves to `None` when no cafe has that id.
#[derive(Message)]
#[rtype(result = "QueryResult<Option<Cafe>>")]
pub struct UpdateCafe {
    pub id: i32,
    pub form: CafeForm,
}

/// Resolves to `false` when no cafe has that id.
#[derive(Message)]
#[rtype(result = "QueryResult<bool>")]
pub struct UpdateCafePrice {
    pub id: i32,
    pub coffee_price: Option<String>,
}

#[derive(Message)]
#[rtype(result = "QueryResult<bool>")]
pub struct DeleteCafe(pub i32);
