//! Client-side pipeline for the charity donation service.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               CHARITY CLIENT                  │
//!                    │                                               │
//!   Donation form    │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│ security │──▶│  submit  │──▶│ backend  │  │
//!                    │  │ pipeline │   │  client  │   │   API    │  │
//!                    │  └──────────┘   └──────────┘   └──────────┘  │
//!                    │                                               │
//!   UI text keys     │  ┌──────────┐   ┌──────────┐                 │
//!   ─────────────────┼─▶│   i18n   │──▶│translate │                 │
//!                    │  │ resolver │   │   API    │                 │
//!                    │  └──────────┘   └──────────┘                 │
//!                    │                                               │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │         Cross-Cutting Concerns          │  │
//!                    │  │  config · storage · telemetry           │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod security;
pub mod submit;

// Translation layer
pub mod i18n;

// Cross-cutting concerns
pub mod config;
pub mod storage;
pub mod telemetry;

pub use config::ClientConfig;
pub use security::SecurityContext;
pub use storage::SessionStore;
pub use submit::SecureClient;
pub use telemetry::Shutdown;
