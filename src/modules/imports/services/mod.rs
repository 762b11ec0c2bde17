pub mod parsers;
pub mod quarter_importer;

pub use quarter_importer::QuarterImporter;
