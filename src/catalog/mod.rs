mod error;
mod tle;

pub use error::CatalogError;
pub use tle::{TleCatalog, TleEntry};

/// Maps a NORAD catalog id to the name the orbital catalog currently holds.
pub trait NameResolver {
    fn resolve_name(&self, norad: u32) -> Option<String>;
}
