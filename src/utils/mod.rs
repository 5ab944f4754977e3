pub mod alias_cache;
pub mod alias_filter;
