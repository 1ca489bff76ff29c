pub mod bill_sheet;
pub mod enums;
pub mod service_code;
pub mod unit_block;

pub use bill_sheet::*;
pub use service_code::*;
pub use unit_block::*;
