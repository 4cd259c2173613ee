pub mod cmr;
pub mod genelab;
pub mod images;
pub mod osdr;

pub use cmr::CmrSource;
pub use genelab::GeneLabSource;
pub use images::ImagesSource;
pub use osdr::OsdrSource;
