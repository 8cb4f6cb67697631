pub mod service;
pub mod subscriber;
pub mod transfer;

#[cfg(test)]
mod testing;
