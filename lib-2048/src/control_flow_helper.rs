use std::ops::ControlFlow;

/// Extracts the value of a `try_fold` that breaks and continues with the
/// same type.
pub trait ControlFlowHelper<T> {
    fn into_inner(self) -> T;
}

impl<T> ControlFlowHelper<T> for ControlFlow<T, T> {
    fn into_inner(self) -> T {
        match self {
            Self::Break(inner) | Self::Continue(inner) => inner,
        }
    }
}
