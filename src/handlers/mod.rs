pub mod account;
pub mod pages;
