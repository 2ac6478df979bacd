//! Infrastructure layer: concrete storage backends.

pub mod storage;
