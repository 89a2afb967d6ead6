//! `tg-routes` — weighted route tables over a generated corridor.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`policy`] | `RoutePolicy` trait, `DeclaredRoutes`, `UniformCorridorRoutes` |
//! | [`table`]  | `RouteEntry`, `RouteTable` (validation + sampling)        |
//! | [`loader`] | `load_routes_csv`, `load_routes_reader`                   |
//!
//! A policy only proposes candidate paths.  [`RouteTable::validate`] checks
//! them regardless of where they came from, so swapping the policy never
//! weakens the guarantees on the finished table.

pub mod loader;
pub mod policy;
pub mod table;


pub use loader::{load_routes_csv, load_routes_reader};
pub use policy::{DeclaredEntry, DeclaredPath, DeclaredRoutes, RoutePolicy, UniformCorridorRoutes};
pub use table::{EntryRoutes, RouteEntry, RouteTable, WEIGHT_TOLERANCE};
