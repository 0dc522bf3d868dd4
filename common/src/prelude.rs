mod futures;

pub use futures::FutureTimeout;
