pub mod datasource;
pub mod error;
pub mod model;
#[cfg(test)]
mod test_utils;
pub mod utils;
