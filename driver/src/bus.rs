mod inmemory;

pub use self::inmemory::*;
