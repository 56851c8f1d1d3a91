/// Running total of memory retained by recorded commands.
#[derive(Default, Debug)]
pub struct ByteLedger {
    total: usize,
}

impl ByteLedger {
    pub fn add(&mut self, bytes: usize) {
        self.total += bytes;
    }

    pub fn sub(&mut self, bytes: usize) {
        self.total = self
            .total
            .checked_sub(bytes)
            .unwrap_or_else(|| panic!("released {bytes} bytes but only {} are retained", self.total));
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
