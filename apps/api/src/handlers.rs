pub mod dev_cache;
pub mod health;
pub mod permissions;
pub mod security;

#[cfg(test)]
pub(crate) mod test_support;
