pub mod ast;
pub mod parser;

pub use ast::{
    DateFilter, DateGranularity, Filter, IdFilter, KeyFilter, ParsedQuery, QueryError,
    StatComparison, StatFilter,
};
pub use parser::{parse, QueryParser};
