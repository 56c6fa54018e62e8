//! In-memory storage implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{
    BookingOutcome, Item, ItemRepository, Page, PageRequest, Rental, RentalPeriod,
    RentalRepository, RentalStatus, User, UserRepository,
};
use crate::shared::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    items: BTreeMap<i64, Item>,
    rentals: BTreeMap<i64, Rental>,
}

impl Tables {
    fn user_has_rentals(&self, user_id: i64) -> bool {
        self.rentals.values().any(|r| {
            r.renter_id == user_id
                || self
                    .items
                    .get(&r.item_id)
                    .is_some_and(|item| item.owner_id == user_id)
        })
    }
}

/// Users, items and rentals behind a single lock.
///
/// One lock over all tables keeps cross-table rules (foreign keys, the
/// booking overlap check) atomic, matching what the PostgreSQL schema
/// guarantees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }

    pub fn rental_count(&self) -> usize {
        self.tables.read().rentals.len()
    }
}

fn paginate<'a>(rentals: impl Iterator<Item = &'a Rental>, page: PageRequest) -> Page<Rental> {
    let matching: Vec<&Rental> = rentals.collect();
    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();

    Page::new(items, page, total)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().users.values().any(|u| u.email == email))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        if tables.users.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("User with id {} already exists", user.id)));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write();
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))?;

        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.phone_number = user.phone_number.clone();
        stored.description = user.description.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&id) {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        if tables.user_has_rentals(id) {
            return Err(AppError::Conflict(format!(
                "User with id {} is referenced by rentals",
                id
            )));
        }

        tables.items.retain(|_, item| item.owner_id != id);
        tables.users.remove(&id);
        Ok(())
    }

    async fn has_rentals(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.read().user_has_rentals(id))
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, AppError> {
        Ok(self.tables.read().items.get(&id).cloned())
    }

    async fn create(&self, item: &Item) -> Result<Item, AppError> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&item.owner_id) {
            return Err(AppError::NotFound(format!(
                "Owner with id {} not found",
                item.owner_id
            )));
        }

        tables.items.insert(item.id, item.clone());
        Ok(item.clone())
    }
}

#[async_trait]
impl RentalRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Rental>, AppError> {
        Ok(self.tables.read().rentals.get(&id).cloned())
    }

    async fn find_overlapping(
        &self,
        item_id: i64,
        period: RentalPeriod,
    ) -> Result<Vec<Rental>, AppError> {
        Ok(self
            .tables
            .read()
            .rentals
            .values()
            .filter(|r| r.item_id == item_id && r.overlaps(&period))
            .cloned()
            .collect())
    }

    async fn find_by_item_and_statuses(
        &self,
        item_id: i64,
        statuses: Vec<RentalStatus>,
    ) -> Result<Vec<Rental>, AppError> {
        Ok(self
            .tables
            .read()
            .rentals
            .values()
            .filter(|r| r.item_id == item_id)
            .filter(|r| statuses.is_empty() || statuses.contains(&r.status))
            .cloned()
            .collect())
    }

    async fn create_if_available(&self, rental: &Rental) -> Result<BookingOutcome, AppError> {
        // Check and insert under one write guard
        let mut tables = self.tables.write();

        if !tables.items.contains_key(&rental.item_id) {
            return Ok(BookingOutcome::ItemMissing);
        }
        if !tables.users.contains_key(&rental.renter_id) {
            return Ok(BookingOutcome::RenterMissing);
        }

        let period = rental.period();
        let booked = tables
            .rentals
            .values()
            .any(|r| r.item_id == rental.item_id && r.overlaps(&period));
        if booked {
            return Ok(BookingOutcome::Overlap);
        }

        tables.rentals.insert(rental.id, rental.clone());
        Ok(BookingOutcome::Created(rental.clone()))
    }

    async fn update_status(
        &self,
        id: i64,
        status: RentalStatus,
    ) -> Result<Option<Rental>, AppError> {
        let mut tables = self.tables.write();
        Ok(tables.rentals.get_mut(&id).map(|rental| {
            rental.status = status;
            rental.updated_at = Utc::now();
            rental.clone()
        }))
    }

    async fn find_by_renter(
        &self,
        renter_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError> {
        let tables = self.tables.read();
        Ok(paginate(
            tables.rentals.values().filter(|r| r.renter_id == renter_id),
            page,
        ))
    }

    async fn find_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError> {
        let tables = self.tables.read();
        Ok(paginate(
            tables.rentals.values().filter(|r| {
                tables
                    .items
                    .get(&r.item_id)
                    .is_some_and(|item| item.owner_id == owner_id)
            }),
            page,
        ))
    }
}
