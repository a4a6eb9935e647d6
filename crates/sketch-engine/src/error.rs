/// Errors from shape/constraint construction, reference resolution, and
/// sketch mutation.
///
/// Solver non-convergence is deliberately absent: it is reported as a
/// structured [`lm_solver::SolveResult`], not an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SketchError {
    #[error("{kind} requires a non-empty name")]
    EmptyName { kind: &'static str },

    #[error("{0}")]
    InvalidOption(String),

    #[error("invalid reference \"{reference}\": expected \"ShapeName.pointName\"")]
    MalformedRef { reference: String },

    #[error("unknown shape \"{name}\"")]
    UnknownShape { name: String },

    #[error("unknown point \"{point}\" on shape \"{shape}\" (known: {known})")]
    UnknownPoint {
        shape: String,
        point: String,
        known: String,
    },

    #[error("unknown edge \"{edge}\" on shape \"{shape}\" (known: {known})")]
    UnknownEdge {
        shape: String,
        edge: String,
        known: String,
    },

    #[error("shape \"{name}\" already exists in this sketch")]
    DuplicateShape { name: String },
}
