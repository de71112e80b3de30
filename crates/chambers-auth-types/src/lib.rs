//! Auth types shared across Chambers services.
//!
//! Provides stateless access-credential validation and the
//! `AuthenticatedSubject` Bearer-token extractor.

pub mod bearer;
pub mod token;
