pub mod chomsky_normal_form;
pub mod context_free;
pub mod erasing;
pub mod names;
pub mod normalize;
pub mod notation;
pub mod properties;
pub mod types;
pub mod unit;
pub mod useless;

#[cfg(test)]
pub(crate) mod fixtures;
