//! Recipe Comprehensive Test Suite
//!
//! End-to-end behavior of the public API, organised by tier.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Resource identity and lifecycle
//! - **Tier 2**: Relationship reconciliation scenarios
//! - **Tier 3**: Atomicity and concurrent updates
//! - **Tier 4**: Property-based reconciliation invariants
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test recipe_comprehensive
//! RUST_LOG=larder=debug cargo test --test recipe_comprehensive -- --nocapture
//! ```

mod test_utils;

// Tier 1: Identity and lifecycle
mod tier1_identity_lifecycle;

// Tier 2: Reconciliation scenarios
mod tier2_reconciliation_scenarios;

// Tier 3: Atomicity and concurrency
mod tier3_atomicity_concurrency;

// Tier 4: Property-based invariants
mod tier4_properties;
