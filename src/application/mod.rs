pub mod draft;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;
