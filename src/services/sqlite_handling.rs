use actix::Handler;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error};
use diesel::{
    Connection, ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, RunQueryDsl,
    SqliteConnection,
};
use rand::seq::SliceRandom;

use crate::schema::cafe::dsl::{cafe, coffee_price, location};
use crate::services::db_models::Cafe;
use crate::services::db_utils::{DbActor, DbPool};
use crate::services::insertable::CafeChanges;
use crate::services::messages::{
    AddCafe, DeleteCafe, FetchCafes, FetchRandomCafe, FindCafesByLocation, UpdateCafe,
    UpdateCafePrice,
};

fn establish_connection(
    pool: &DbPool,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
    pool.get().map_err(|err| {
        tracing::error!(error = %err, "failed to check out a database connection");
        connection_err()
    })
}

fn connection_err() -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::ClosedConnection,
        Box::new("Failed to establish connection".to_owned()),
    )
}

impl Handler<FetchCafes> for DbActor {
    type Result = QueryResult<Vec<Cafe>>;

    fn handle(&mut self, _msg: FetchCafes, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        cafe.order(coffee_price.asc()).load::<Cafe>(&mut conn)
    }
}

impl Handler<FetchRandomCafe> for DbActor {
    type Result = QueryResult<Option<Cafe>>;

    fn handle(&mut self, _msg: FetchRandomCafe, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        let cafes = cafe.load::<Cafe>(&mut conn)?;

        Ok(cafes.choose(&mut rand::thread_rng()).cloned())
    }
}

impl Handler<FindCafesByLocation> for DbActor {
    type Result = QueryResult<Vec<Cafe>>;

    fn handle(&mut self, msg: FindCafesByLocation, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        cafe.filter(location.eq(msg.0)).load::<Cafe>(&mut conn)
    }
}

impl Handler<AddCafe> for DbActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, msg: AddCafe, _ctx: &mut Self::Context) -> Self::Result {
        let new_cafe = CafeChanges::try_from(msg.0)?;
        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(cafe).values(&new_cafe).execute(&mut conn)?;

        Ok(())
    }
}

impl Handler<UpdateCafe> for DbActor {
    type Result = QueryResult<Option<Cafe>>;

    fn handle(&mut self, msg: UpdateCafe, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        conn.transaction::<_, Error, _>(|trx_conn| {
            if cafe.find(msg.id).first::<Cafe>(trx_conn).optional()?.is_none() {
                return Ok(None);
            }

            let changes = CafeChanges::try_from(msg.form)?;

            diesel::update(cafe.find(msg.id))
                .set(&changes)
                .execute(trx_conn)?;

            cafe.find(msg.id).first::<Cafe>(trx_conn).map(Some)
        })
    }
}

impl Handler<UpdateCafePrice> for DbActor {
    type Result = QueryResult<bool>;

    fn handle(&mut self, msg: UpdateCafePrice, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        let updated = diesel::update(cafe.find(msg.id))
            .set(coffee_price.eq(msg.coffee_price))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }
}

impl Handler<DeleteCafe> for DbActor {
    type Result = QueryResult<bool>;

    fn handle(&mut self, msg: DeleteCafe, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        let deleted = diesel::delete(cafe.find(msg.0)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
