//! Statement inspection on top of the sqlparser tokenizer
//!
//! Only tokenizes, never parses: the embedded engine stays the judge of what
//! is valid SQL. Semicolons inside string literals, quoted identifiers and
//! comments are handled by the tokenizer.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Count the statements in `sql`.
///
/// Whitespace, comments and empty statements (`;;`) do not count. Returns
/// `None` when the text cannot be tokenized (e.g. an unterminated string), in
/// which case the engine should report the problem itself.
pub fn count_statements(sql: &str) -> Option<usize> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize().ok()?;

    let mut count = 0;
    let mut in_statement = false;
    for token in &tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon => in_statement = false,
            _ => {
                if !in_statement {
                    count += 1;
                    in_statement = true;
                }
            }
        }
    }
    Some(count)
}
