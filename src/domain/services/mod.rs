//! Domain services for business rules that span entities.

pub mod policy;

pub use policy::{Action, Actor, Decision, PolicyService};
