use crate::Vertex;

/// Structural errors.  A cycle or a missing root is not one of these: those are
/// ordinary results of the respective queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("invalid vertex count: {vertex_count}")]
    InvalidArgument { vertex_count: i64 },

    #[error("vertex {vertex} out of range for a graph of {vertex_count} vertices")]
    OutOfRange { vertex: Vertex, vertex_count: usize },

    #[error("a {size}x{size} matrix exceeds the largest representable size")]
    MatrixTooLarge { size: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;
