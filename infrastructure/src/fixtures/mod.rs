//! File-system fixture loading

mod directory;

pub use directory::DirectoryFixtureSource;
