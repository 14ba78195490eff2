pub mod field_errors;
pub mod interceptor;
pub mod normalize;
pub mod tooltip;

#[cfg(test)]
pub(crate) mod test_support;
