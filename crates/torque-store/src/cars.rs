//! CRUD operations for [`Car`] records.

use rusqlite::params;
use torque_shared::{Car, NewCar};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::row::uuid_at;

const SELECT_CAR: &str = "SELECT id, brand, model, year, description, image, engine, power,
        acceleration, consumption, drive_type, category, video_url, reliability
 FROM cars";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a validated car and return it with its new id.
    pub fn create_car(&self, new_car: NewCar) -> Result<Car> {
        let car = Car::from_insert(new_car, Uuid::new_v4());

        self.conn().execute(
            "INSERT INTO cars (id, brand, model, year, description, image, engine, power,
                               acceleration, consumption, drive_type, category, video_url, reliability)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                car.id.to_string(),
                car.brand,
                car.model,
                car.year,
                car.description,
                car.image,
                car.engine,
                car.power,
                car.acceleration,
                car.consumption,
                car.drive_type,
                car.category,
                car.video_url,
                car.reliability,
            ],
        )?;

        tracing::debug!(id = %car.id, brand = %car.brand, model = %car.model, "car created");
        Ok(car)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single car by id.
    pub fn get_car(&self, id: Uuid) -> Result<Car> {
        self.conn()
            .query_row(
                &format!("{SELECT_CAR} WHERE id = ?1"),
                params![id.to_string()],
                row_to_car,
            )
            .map_err(StoreError::from_lookup)
    }

    /// List all cars, ordered by brand then model.
    pub fn list_cars(&self) -> Result<Vec<Car>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_CAR} ORDER BY brand ASC, model ASC, year DESC"))?;

        let rows = stmt.query_map([], row_to_car)?;

        let mut cars = Vec::new();
        for row in rows {
            cars.push(row?);
        }
        Ok(cars)
    }

    /// List the cars of one category, ordered by brand then model.
    pub fn list_cars_by_category(&self, category: &str) -> Result<Vec<Car>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_CAR} WHERE category = ?1 ORDER BY brand ASC, model ASC, year DESC"
        ))?;

        let rows = stmt.query_map(params![category], row_to_car)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace every caller-supplied field of an existing car.
    pub fn replace_car(&self, id: Uuid, new_car: NewCar) -> Result<Car> {
        let car = Car::from_insert(new_car, id);

        let affected = self.conn().execute(
            "UPDATE cars
             SET brand = ?2, model = ?3, year = ?4, description = ?5, image = ?6, engine = ?7,
                 power = ?8, acceleration = ?9, consumption = ?10, drive_type = ?11,
                 category = ?12, video_url = ?13, reliability = ?14
             WHERE id = ?1",
            params![
                car.id.to_string(),
                car.brand,
                car.model,
                car.year,
                car.description,
                car.image,
                car.engine,
                car.power,
                car.acceleration,
                car.consumption,
                car.drive_type,
                car.category,
                car.video_url,
                car.reliability,
            ],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(car)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a car by id. Returns `true` if a row was deleted.
    pub fn delete_car(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM cars WHERE id = ?1", params![id.to_string()])?;
        tracing::debug!(%id, deleted = affected > 0, "car delete");
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Car`].
fn row_to_car(row: &rusqlite::Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: uuid_at(row, 0)?,
        brand: row.get(1)?,
        model: row.get(2)?,
        year: row.get(3)?,
        description: row.get(4)?,
        image: row.get(5)?,
        engine: row.get(6)?,
        power: row.get(7)?,
        acceleration: row.get(8)?,
        consumption: row.get(9)?,
        drive_type: row.get(10)?,
        category: row.get(11)?,
        video_url: row.get(12)?,
        reliability: row.get(13)?,
    })
}
