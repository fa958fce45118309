pub mod common;

mod backoff;
