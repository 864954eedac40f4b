//! In-memory repository implementations.
//!
//! Semantics mirror the SQLite repositories (validation, uniqueness,
//! ordering, pagination) so services can be tested without a database.
//! Stores are interior-mutable and not thread-safe.
//!
//! Stores are independent: a check-in may name a gym or user that no store
//! holds. The SQLite repository rejects those writes with
//! `RepoError::MissingReference`.

use crate::clock::utc_date;
use crate::geo::Coordinate;
use crate::model::check_in::{CheckIn, CheckInId};
use crate::model::gym::{Gym, GymId};
use crate::model::user::{normalize_email, User, UserId};
use crate::repo::check_in_repo::CheckInRepository;
use crate::repo::gym_repo::{sort_by_distance, GymRepository};
use crate::repo::user_repo::UserRepository;
use crate::repo::{page_offset, RepoError, RepoResult, PAGE_SIZE};
use chrono::NaiveDate;
use std::cell::RefCell;

fn paginate<T>(items: Vec<T>, page: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(page_offset(page) as usize)
        .take(PAGE_SIZE as usize)
        .collect()
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    items: RefCell<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored users in insertion order.
    pub fn items(&self) -> Vec<User> {
        self.items.borrow().clone()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;
        let mut items = self.items.borrow_mut();
        if items.iter().any(|existing| existing.email == user.email) {
            return Err(RepoError::Duplicate {
                entity: "user",
                field: "email",
                value: user.email.clone(),
            });
        }
        items.push(user.clone());
        Ok(user.id)
    }

    fn find_user_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.items.borrow().iter().find(|u| u.id == id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .items
            .borrow()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// In-memory gym store.
#[derive(Debug, Default)]
pub struct InMemoryGymRepository {
    items: RefCell<Vec<Gym>>,
}

impl InMemoryGymRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a gym directly, bypassing validation.
    pub fn insert(&self, gym: Gym) {
        self.items.borrow_mut().push(gym);
    }

    pub fn items(&self) -> Vec<Gym> {
        self.items.borrow().clone()
    }
}

impl GymRepository for InMemoryGymRepository {
    fn create_gym(&self, gym: &Gym) -> RepoResult<GymId> {
        gym.validate()?;
        self.items.borrow_mut().push(gym.clone());
        Ok(gym.id)
    }

    fn find_gym_by_id(&self, id: GymId) -> RepoResult<Option<Gym>> {
        Ok(self.items.borrow().iter().find(|g| g.id == id).cloned())
    }

    fn search_gyms(&self, query: &str, page: u32) -> RepoResult<Vec<Gym>> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<Gym> = self
            .items
            .borrow()
            .iter()
            .filter(|gym| gym.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(paginate(matches, page))
    }

    fn find_gyms_nearby(&self, center: Coordinate, radius_km: f64) -> RepoResult<Vec<Gym>> {
        Ok(sort_by_distance(self.items(), center, radius_km))
    }
}

/// In-memory check-in store.
#[derive(Debug, Default)]
pub struct InMemoryCheckInRepository {
    items: RefCell<Vec<CheckIn>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> Vec<CheckIn> {
        self.items.borrow().clone()
    }
}

impl CheckInRepository for InMemoryCheckInRepository {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId> {
        check_in.validate()?;
        self.items.borrow_mut().push(check_in.clone());
        Ok(check_in.id)
    }

    fn save_check_in(&self, check_in: &CheckIn) -> RepoResult<()> {
        check_in.validate()?;
        let mut items = self.items.borrow_mut();
        match items.iter_mut().find(|existing| existing.id == check_in.id) {
            Some(slot) => {
                *slot = check_in.clone();
                Ok(())
            }
            None => Err(RepoError::NotFound {
                entity: "check-in",
                id: check_in.id,
            }),
        }
    }

    fn find_check_in_by_id(&self, id: CheckInId) -> RepoResult<Option<CheckIn>> {
        Ok(self.items.borrow().iter().find(|c| c.id == id).cloned())
    }

    fn find_check_in_on_day(
        &self,
        user_id: UserId,
        gym_id: GymId,
        day: NaiveDate,
    ) -> RepoResult<Option<CheckIn>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|c| c.user_id == user_id && c.gym_id == gym_id)
            .filter(|c| utc_date(c.created_at) == day)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    fn list_check_ins_by_user(&self, user_id: UserId, page: u32) -> RepoResult<Vec<CheckIn>> {
        let mut owned: Vec<CheckIn> = self
            .items
            .borrow()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(owned, page))
    }

    fn count_check_ins_by_user(&self, user_id: UserId) -> RepoResult<u64> {
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|c| c.user_id == user_id)
            .count() as u64)
    }
}
