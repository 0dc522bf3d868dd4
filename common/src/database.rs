mod ulid;

pub use ulid::Ulid;
