use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::error::{PartitionError, Result};

/// Asserts that `name` is a plain, optionally dot-qualified, unquoted SQL identifier.
///
/// Partition table, index, function and trigger names are built by appending to the
/// names given here, so quoted identifiers and anything carrying whitespace or
/// punctuation are refused before a template ever sees them.
pub fn validate_identifier(name: &str) -> Result<()> {
    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, name)
        .tokenize()
        .map_err(|err| PartitionError::Identifier(format!("'{}': {}", name, err)))?;

    let mut expect_word = true;
    for token in &tokens {
        match (expect_word, token) {
            (true, Token::Word(word)) if word.quote_style.is_none() => expect_word = false,
            (false, Token::Period) => expect_word = true,
            _ => {
                return Err(PartitionError::Identifier(format!(
                    "'{}' is not a plain SQL identifier",
                    name
                )))
            }
        }
    }
    if expect_word {
        return Err(PartitionError::Identifier(format!(
            "'{}' is not a plain SQL identifier",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        assert!(validate_identifier("test_part").is_ok());
        assert!(validate_identifier("adweekid").is_ok());
        assert!(validate_identifier("public.measurements").is_ok());
    }

    #[test]
    fn test_rejects_everything_else() {
        for name in ["", "two words", "t; DROP TABLE x", "\"Quoted\"", "schema.", ".t", "a,b"] {
            assert!(
                matches!(validate_identifier(name), Err(PartitionError::Identifier(_))),
                "{} should be rejected",
                name
            );
        }
    }
}
