#[path = "e2e/scalar_families.rs"]
mod scalar_families;

#[path = "e2e/collection_policies.rs"]
mod collection_policies;

#[path = "e2e/table_migration.rs"]
mod table_migration;

#[path = "e2e/config_driven.rs"]
mod config_driven;
