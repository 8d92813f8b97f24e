/// An administrative grouping of same-owner provinces.
#[derive(Debug, Clone)]
pub struct V2State {
    id: usize,
    provinces: Vec<u32>,
}

impl V2State {
    pub fn new(id: usize, provinces: Vec<u32>) -> Self {
        V2State { id, provinces }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn provinces(&self) -> &[u32] {
        &self.provinces
    }
}
