mod reader;

pub use reader::{CalamineReader, RawWorkbook, WorkbookReader};
