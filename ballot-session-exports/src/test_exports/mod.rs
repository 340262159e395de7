// Copyright (c) 2022 MASSA LABS <info@massa.net>

mod chain;

pub use chain::*;

#[cfg(test)]
mod tests;
