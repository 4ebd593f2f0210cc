pub use self::{
    parsing::{parse_integer, parse_month, DEFAULT_MONTH_FORMAT},
    validation::validate_identifier,
};

pub mod parsing;
pub mod validation;
