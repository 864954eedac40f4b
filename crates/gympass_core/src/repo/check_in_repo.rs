//! Check-in repository contract and SQLite implementation.
//!
//! # Invariants
//! - "Same day" means the same UTC calendar day of `created_at`.
//! - History lists are ordered by `created_at DESC, id ASC`.
//! - Writes naming an unknown gym or user fail with `MissingReference`.

use crate::clock::utc_day_bounds;
use crate::model::check_in::{CheckIn, CheckInId};
use crate::model::gym::GymId;
use crate::model::user::UserId;
use crate::repo::{
    is_foreign_key_violation, page_offset, parse_uuid, RepoError, RepoResult, PAGE_SIZE,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const CHECK_IN_SELECT_SQL: &str =
    "SELECT id, gym_id, user_id, created_at, validated_at FROM check_ins";

/// Repository interface for check-ins.
pub trait CheckInRepository {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId>;
    /// Persists changes to an existing check-in. Returns `NotFound` if absent.
    fn save_check_in(&self, check_in: &CheckIn) -> RepoResult<()>;
    fn find_check_in_by_id(&self, id: CheckInId) -> RepoResult<Option<CheckIn>>;
    /// First check-in by `user_id` at `gym_id` created on `day` (UTC).
    fn find_check_in_on_day(
        &self,
        user_id: UserId,
        gym_id: GymId,
        day: NaiveDate,
    ) -> RepoResult<Option<CheckIn>>;
    fn list_check_ins_by_user(&self, user_id: UserId, page: u32) -> RepoResult<Vec<CheckIn>>;
    fn count_check_ins_by_user(&self, user_id: UserId) -> RepoResult<u64>;
}

impl<T: CheckInRepository + ?Sized> CheckInRepository for &T {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId> {
        (**self).create_check_in(check_in)
    }

    fn save_check_in(&self, check_in: &CheckIn) -> RepoResult<()> {
        (**self).save_check_in(check_in)
    }

    fn find_check_in_by_id(&self, id: CheckInId) -> RepoResult<Option<CheckIn>> {
        (**self).find_check_in_by_id(id)
    }

    fn find_check_in_on_day(
        &self,
        user_id: UserId,
        gym_id: GymId,
        day: NaiveDate,
    ) -> RepoResult<Option<CheckIn>> {
        (**self).find_check_in_on_day(user_id, gym_id, day)
    }

    fn list_check_ins_by_user(&self, user_id: UserId, page: u32) -> RepoResult<Vec<CheckIn>> {
        (**self).list_check_ins_by_user(user_id, page)
    }

    fn count_check_ins_by_user(&self, user_id: UserId) -> RepoResult<u64> {
        (**self).count_check_ins_by_user(user_id)
    }
}

/// SQLite-backed check-in repository.
pub struct SqliteCheckInRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCheckInRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn map_write_error(&self, err: rusqlite::Error, check_in: &CheckIn) -> RepoError {
        if !is_foreign_key_violation(&err) {
            return err.into();
        }
        // SQLite does not say which key failed; the gym is checked first.
        match self.gym_exists(check_in.gym_id) {
            Ok(false) => RepoError::MissingReference {
                entity: "gym",
                id: check_in.gym_id,
            },
            Ok(true) => RepoError::MissingReference {
                entity: "user",
                id: check_in.user_id,
            },
            Err(lookup_err) => lookup_err,
        }
    }

    fn gym_exists(&self, id: GymId) -> RepoResult<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM gyms WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?)
    }
}

impl CheckInRepository for SqliteCheckInRepository<'_> {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId> {
        check_in.validate()?;

        self.conn.execute(
            "INSERT INTO check_ins (id, gym_id, user_id, created_at, validated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                check_in.id.to_string(),
                check_in.gym_id.to_string(),
                check_in.user_id.to_string(),
                check_in.created_at,
                check_in.validated_at,
            ],
        )
        .map_err(|err| self.map_write_error(err, check_in))?;

        Ok(check_in.id)
    }

    fn save_check_in(&self, check_in: &CheckIn) -> RepoResult<()> {
        check_in.validate()?;

        let changed = self.conn.execute(
            "UPDATE check_ins
             SET
                gym_id = ?1,
                user_id = ?2,
                created_at = ?3,
                validated_at = ?4
             WHERE id = ?5;",
            params![
                check_in.gym_id.to_string(),
                check_in.user_id.to_string(),
                check_in.created_at,
                check_in.validated_at,
                check_in.id.to_string(),
            ],
        )
        .map_err(|err| self.map_write_error(err, check_in))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "check-in",
                id: check_in.id,
            });
        }

        Ok(())
    }

    fn find_check_in_by_id(&self, id: CheckInId) -> RepoResult<Option<CheckIn>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHECK_IN_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_check_in_row(row)?));
        }

        Ok(None)
    }

    fn find_check_in_on_day(
        &self,
        user_id: UserId,
        gym_id: GymId,
        day: NaiveDate,
    ) -> RepoResult<Option<CheckIn>> {
        let (start, end) = utc_day_bounds(day);
        let mut stmt = self.conn.prepare(&format!(
            "{CHECK_IN_SELECT_SQL}
             WHERE user_id = ?1
               AND gym_id = ?2
               AND created_at >= ?3
               AND created_at < ?4
             ORDER BY created_at ASC, id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![
            user_id.to_string(),
            gym_id.to_string(),
            start,
            end
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_check_in_row(row)?));
        }

        Ok(None)
    }

    fn list_check_ins_by_user(&self, user_id: UserId, page: u32) -> RepoResult<Vec<CheckIn>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHECK_IN_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), PAGE_SIZE, page_offset(page)])?;
        let mut check_ins = Vec::new();
        while let Some(row) = rows.next()? {
            check_ins.push(parse_check_in_row(row)?);
        }

        Ok(check_ins)
    }

    fn count_check_ins_by_user(&self, user_id: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM check_ins WHERE user_id = ?1;",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative check-in count `{count}`")))
    }
}

fn parse_check_in_row(row: &Row<'_>) -> RepoResult<CheckIn> {
    let id_text: String = row.get("id")?;
    let gym_text: String = row.get("gym_id")?;
    let user_text: String = row.get("user_id")?;

    let check_in = CheckIn {
        id: parse_uuid(&id_text, "check_ins.id")?,
        gym_id: parse_uuid(&gym_text, "check_ins.gym_id")?,
        user_id: parse_uuid(&user_text, "check_ins.user_id")?,
        created_at: row.get("created_at")?,
        validated_at: row.get("validated_at")?,
    };
    check_in.validate()?;
    Ok(check_in)
}
