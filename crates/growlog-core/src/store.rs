//! The `PlantStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `growlog-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.
//! Lookups of absent rows return `None` (or `false`); translating that into a
//! not-found error is the caller's business.

use std::future::Future;

use uuid::Uuid;

use crate::{
  fact::{Fact, FactPatch, MoveDirection, NewFact},
  owner::{NewOwner, Owner, OwnerPatch},
  plant::{NewPlant, Plant, PlantPatch, PlantQuery},
};

/// Abstraction over a growlog store backend.
///
/// Every method is a single all-or-nothing change. Within one plant, fact
/// positions stay a contiguous zero-based sequence across
/// [`append_fact`](Self::append_fact), [`delete_fact`](Self::delete_fact) and
/// [`move_fact`](Self::move_fact).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlantStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Owners ────────────────────────────────────────────────────────────

  fn add_owner(
    &self,
    input: NewOwner,
  ) -> impl Future<Output = Result<Owner, Self::Error>> + Send + '_;

  fn get_owner(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Owner>, Self::Error>> + Send + '_;

  fn find_owner_by_name(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<Owner>, Self::Error>> + Send + '_;

  fn list_owners(
    &self,
  ) -> impl Future<Output = Result<Vec<Owner>, Self::Error>> + Send + '_;

  fn update_owner(
    &self,
    id: Uuid,
    patch: OwnerPatch,
  ) -> impl Future<Output = Result<Option<Owner>, Self::Error>> + Send + '_;

  /// Delete an owner together with their plants and facts.
  fn delete_owner(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_owners(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Plants ────────────────────────────────────────────────────────────

  fn add_plant(
    &self,
    input: NewPlant,
  ) -> impl Future<Output = Result<Plant, Self::Error>> + Send + '_;

  fn get_plant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Plant>, Self::Error>> + Send + '_;

  /// Plants matching `query`, ordered by number then name.
  fn list_plants(
    &self,
    query: PlantQuery,
  ) -> impl Future<Output = Result<Vec<Plant>, Self::Error>> + Send + '_;

  fn update_plant(
    &self,
    id: Uuid,
    patch: PlantPatch,
  ) -> impl Future<Output = Result<Option<Plant>, Self::Error>> + Send + '_;

  /// Delete a plant and every fact it owns.
  fn delete_plant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Persist a fact at the tail of its plant's sequence. The position and
  /// both timestamps are set by the store.
  fn append_fact(
    &self,
    input: NewFact,
  ) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;

  fn get_fact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  /// All facts of a plant in position order.
  fn list_facts(
    &self,
    plant_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Fact>, Self::Error>> + Send + '_;

  /// The lowest-positioned fact of a plant carrying exactly `label`.
  fn find_fact_by_label(
    &self,
    plant_id: Uuid,
    label: String,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  /// Apply `patch` and bump `updated_at`. Position is never touched.
  fn update_fact(
    &self,
    id: Uuid,
    patch: FactPatch,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  /// Remove a fact and close the gap it leaves. Returns the removed fact.
  fn delete_fact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  /// Swap a fact with its nearest neighbour in `direction`. Returns the
  /// fact's position afterwards, unchanged when no neighbour exists.
  fn move_fact(
    &self,
    id: Uuid,
    direction: MoveDirection,
  ) -> impl Future<Output = Result<Option<u32>, Self::Error>> + Send + '_;
}
