#![allow(dead_code, unused_imports)]

pub use repowatch_test_utils::builders;
pub use repowatch_test_utils::fixture::RepoFixture;
pub use repowatch_test_utils::{init_tracing, with_timeout};
