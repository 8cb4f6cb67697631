use vodca::References;

#[derive(Debug, Clone, References)]
pub struct BusConfig {
    capacity: usize,
}

impl BusConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new(1000)
    }
}
