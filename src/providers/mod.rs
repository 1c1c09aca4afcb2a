pub mod transip;
