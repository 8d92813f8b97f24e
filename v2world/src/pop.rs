/// A destination-world pop, already expressed in destination cultures and
/// religions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V2Pop {
    pub kind: String,
    pub culture: String,
    pub religion: String,
    pub size: i32,
}
