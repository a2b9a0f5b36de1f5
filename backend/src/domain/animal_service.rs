//! # Animal Service
//!
//! Data access for a student's animals, plus the herd summary shown above the
//! animal list. Listings are newest first.

use std::sync::Arc;

use chrono::Utc;
use shared::{Animal, AnimalFilter, AnimalStatus, AnimalUpdate, HerdSummary, NewAnimal, SortDirection};
use tracing::info;

use crate::storage::{collections, Query, QueryResult, Repository, RowStore};

#[derive(Clone)]
pub struct AnimalService {
    animals: Repository<Animal>,
}

/// Owner scope and filters for an animal listing
pub(crate) fn animal_query(user_id: &str, filter: &AnimalFilter) -> Query {
    let mut query = Query::new().eq("user_id", user_id);

    if let Some(species) = filter.species {
        query = query.eq("species", species.as_str());
    }
    if let Some(status) = filter.status {
        query = query.eq("status", status.as_str());
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.ilike("name", format!("%{}%", search));
    }

    query.order("created_at", SortDirection::Desc)
}

impl AnimalService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            animals: Repository::new(store, collections::ANIMALS),
        }
    }

    pub async fn get_animals(&self, user_id: &str, filter: &AnimalFilter) -> QueryResult<Vec<Animal>> {
        info!("Listing animals for user {} with {:?}", user_id, filter);
        let result = self.animals.list(&animal_query(user_id, filter)).await;
        QueryResult::logged("list animals", result)
    }

    pub async fn get_animal_by_id(&self, animal_id: &str) -> QueryResult<Animal> {
        info!("Getting animal {}", animal_id);
        QueryResult::logged("get animal", self.animals.get(animal_id).await)
    }

    pub async fn create_animal(&self, animal: &NewAnimal) -> QueryResult<Animal> {
        info!("Creating animal {} for user {}", animal.name, animal.user_id);
        QueryResult::logged("create animal", self.animals.create(animal).await)
    }

    /// Apply a partial update, stamping `updated_at` unless the caller did
    pub async fn update_animal(&self, animal_id: &str, update: &AnimalUpdate) -> QueryResult<Animal> {
        info!("Updating animal {}", animal_id);
        let update = AnimalUpdate {
            updated_at: update.updated_at.or_else(|| Some(Utc::now())),
            ..update.clone()
        };
        QueryResult::logged("update animal", self.animals.update(animal_id, &update).await)
    }

    pub async fn delete_animal(&self, animal_id: &str) -> QueryResult<()> {
        info!("Deleting animal {}", animal_id);
        QueryResult::logged("delete animal", self.animals.delete(animal_id).await)
    }

    pub fn herd_summary(animals: &[Animal]) -> HerdSummary {
        HerdSummary {
            total_animals: animals.len(),
            active_animals: animals
                .iter()
                .filter(|a| a.status == AnimalStatus::Active)
                .count(),
            total_value: animals.iter().filter_map(|a| a.acquisition_cost).sum(),
        }
    }
}
