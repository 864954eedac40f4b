//! Gym repository contract and SQLite implementation.
//!
//! # Invariants
//! - Search matches titles case-insensitively (Unicode lowercase) and orders
//!   by lowercased title, then `id`.
//! - Nearby results are ordered by ascending distance, then `id`.
//! - `gyms.title_search` always holds `title.to_lowercase()`.

use crate::geo::{bounding_box, distance_km, Coordinate};
use crate::model::gym::{Gym, GymId};
use crate::repo::{page_offset, parse_uuid, RepoResult, PAGE_SIZE};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const GYM_SELECT_SQL: &str = "SELECT id, title, description, phone, latitude, longitude FROM gyms";

/// Repository interface for gyms.
pub trait GymRepository {
    fn create_gym(&self, gym: &Gym) -> RepoResult<GymId>;
    fn find_gym_by_id(&self, id: GymId) -> RepoResult<Option<Gym>>;
    /// Title substring search, one page of at most `PAGE_SIZE` gyms.
    fn search_gyms(&self, query: &str, page: u32) -> RepoResult<Vec<Gym>>;
    /// Gyms whose great-circle distance to `center` is `<= radius_km`.
    fn find_gyms_nearby(&self, center: Coordinate, radius_km: f64) -> RepoResult<Vec<Gym>>;
}

impl<T: GymRepository + ?Sized> GymRepository for &T {
    fn create_gym(&self, gym: &Gym) -> RepoResult<GymId> {
        (**self).create_gym(gym)
    }

    fn find_gym_by_id(&self, id: GymId) -> RepoResult<Option<Gym>> {
        (**self).find_gym_by_id(id)
    }

    fn search_gyms(&self, query: &str, page: u32) -> RepoResult<Vec<Gym>> {
        (**self).search_gyms(query, page)
    }

    fn find_gyms_nearby(&self, center: Coordinate, radius_km: f64) -> RepoResult<Vec<Gym>> {
        (**self).find_gyms_nearby(center, radius_km)
    }
}

/// SQLite-backed gym repository.
pub struct SqliteGymRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGymRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Gym>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut gyms = Vec::new();
        while let Some(row) = rows.next()? {
            gyms.push(parse_gym_row(row)?);
        }
        Ok(gyms)
    }
}

impl GymRepository for SqliteGymRepository<'_> {
    fn create_gym(&self, gym: &Gym) -> RepoResult<GymId> {
        gym.validate()?;

        self.conn.execute(
            "INSERT INTO gyms (id, title, title_search, description, phone, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                gym.id.to_string(),
                gym.title.as_str(),
                gym.title.to_lowercase(),
                gym.description.as_deref(),
                gym.phone.as_deref(),
                gym.latitude,
                gym.longitude,
            ],
        )?;

        Ok(gym.id)
    }

    fn find_gym_by_id(&self, id: GymId) -> RepoResult<Option<Gym>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GYM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_gym_row(row)?));
        }

        Ok(None)
    }

    fn search_gyms(&self, query: &str, page: u32) -> RepoResult<Vec<Gym>> {
        // SQLite's LIKE and NOCASE only fold ASCII, so match on the stored
        // lowercase copy instead.
        let needle = query.trim().to_lowercase();
        self.collect(
            &format!(
                "{GYM_SELECT_SQL}
                 WHERE instr(title_search, ?1) > 0
                 ORDER BY title_search ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![needle, PAGE_SIZE, page_offset(page)],
        )
    }

    fn find_gyms_nearby(&self, center: Coordinate, radius_km: f64) -> RepoResult<Vec<Gym>> {
        let bounds = bounding_box(center, radius_km);
        let mut values = vec![Value::Real(bounds.min_lat), Value::Real(bounds.max_lat)];
        let mut longitude_clauses = Vec::with_capacity(bounds.longitude_ranges.len());
        for (min_lon, max_lon) in &bounds.longitude_ranges {
            let first = values.len() + 1;
            longitude_clauses.push(format!("longitude BETWEEN ?{} AND ?{}", first, first + 1));
            values.push(Value::Real(*min_lon));
            values.push(Value::Real(*max_lon));
        }

        let candidates = self.collect(
            &format!(
                "{GYM_SELECT_SQL}
                 WHERE latitude BETWEEN ?1 AND ?2
                   AND ({});",
                longitude_clauses.join(" OR ")
            ),
            params_from_iter(values),
        )?;
        Ok(sort_by_distance(candidates, center, radius_km))
    }
}

/// Keeps gyms within `radius_km` of `center`, nearest first.
pub(crate) fn sort_by_distance(gyms: Vec<Gym>, center: Coordinate, radius_km: f64) -> Vec<Gym> {
    let mut within: Vec<(f64, Gym)> = gyms
        .into_iter()
        .map(|gym| (distance_km(center, gym.coordinate()), gym))
        .filter(|(distance, _)| *distance <= radius_km)
        .collect();
    within.sort_by(|(a, gym_a), (b, gym_b)| {
        a.total_cmp(b).then_with(|| gym_a.id.cmp(&gym_b.id))
    });
    within.into_iter().map(|(_, gym)| gym).collect()
}

fn parse_gym_row(row: &Row<'_>) -> RepoResult<Gym> {
    let id_text: String = row.get("id")?;
    let gym = Gym {
        id: parse_uuid(&id_text, "gyms.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        phone: row.get("phone")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    };
    gym.validate()?;
    Ok(gym)
}
