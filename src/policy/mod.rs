//! Policy data structures, inforce loading and applicant identity

mod data;
pub mod identity;
pub mod loader;

pub use data::{Gender, Policy, PolicyStatus, PolicyTerm};
pub use identity::{parse_id_number, IdentityDetails};
pub use loader::{
    load_default_inforce, load_policies, load_policies_from_reader, load_policies_from_reader_with_default_term,
    load_policies_with_default_term,
};
