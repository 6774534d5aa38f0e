#![allow(clippy::needless_return)]

pub mod utils;
