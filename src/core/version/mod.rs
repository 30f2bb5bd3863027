mod compare;

pub use compare::is_at_least;
