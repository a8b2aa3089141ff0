/// SMT-LIB sort (type) representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Mathematical integer sort (unbounded)
    Int,
}
