pub mod errors;
pub mod db;
pub mod user;
pub mod product;
pub mod folder;
pub mod product_folder;

#[cfg(test)]
mod tests;
