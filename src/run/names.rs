//! Injectable resource-name suffix generation.
//!
//! Generated namespace, job, and container names all embed a short random
//! suffix. The generator is a capability passed into the pipeline so tests
//! can supply deterministic names and uniqueness logic can be verified
//! independently of true randomness.

use uuid::Uuid;

/// Prefix shared by every resource kubrun creates.
pub const RESOURCE_PREFIX: &str = "kubrun";

/// Length of the random suffix embedded in generated resource names.
const SUFFIX_LEN: usize = 5;

/// Produces the random suffixes embedded in generated resource names.
pub trait NameGenerator: Send + Sync {
    /// Return a fresh lowercase alphanumeric suffix of fixed length.
    fn suffix(&self) -> String;
}

/// Production generator drawing suffixes from UUIDv4 hex digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNameGenerator;

impl NameGenerator for RandomNameGenerator {
    fn suffix(&self) -> String {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(SUFFIX_LEN);
        suffix
    }
}
