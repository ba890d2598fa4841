//! Registry implementations for looking up latest versions

pub mod rubygems;

pub use rubygems::RubyGemsRegistry;
