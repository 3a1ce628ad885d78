pub mod census;
pub mod fetch;
pub mod output;
pub mod palette;
pub mod parser;
pub mod regions;
pub mod rt;
pub mod schema;
