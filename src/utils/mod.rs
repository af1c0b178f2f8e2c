pub mod changelog;
pub mod changelog_checker;
pub mod config;
pub mod markdown;
pub mod output;
pub mod query;
pub mod semver_ops;
pub mod validator;
