//! SQL mode (generic SQL plus the common T-SQL surface).

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn sql() -> Mode {
    let mut main = ParserRuleSet::new("sql", "MAIN");
    main.set_ignore_case(true);
    main.set_highlight_digits(true);
    main.add_rule(ParserRule::eol_span("--", Comment1, 0));
    main.add_rule(ParserRule::span("/*", "*/", Comment1, 0));
    main.add_rule(ParserRule::span("'", "'", Literal1, 0));
    main.add_rule(ParserRule::span("[", "]", Literal2, 0));

    let mut keywords = KeywordMap::new(true);
    for word in [
        "select", "insert", "update", "delete", "from", "where", "group", "by", "having",
        "order", "union", "all", "distinct", "as", "into", "values", "set", "create", "alter",
        "drop", "table", "view", "index", "trigger", "procedure", "function", "begin", "end",
        "if", "else", "while", "declare", "and", "or", "not", "null", "is", "in", "exists",
        "between", "like", "join", "inner", "outer", "left", "right", "full", "cross", "on",
        "case", "when", "then", "go", "grant", "revoke", "commit", "rollback", "transaction",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in [
        "int", "integer", "smallint", "bigint", "tinyint", "char", "varchar", "nvarchar",
        "nchar", "text", "date", "datetime", "timestamp", "decimal", "numeric", "float",
        "real", "bit", "binary", "varbinary", "money",
    ] {
        keywords.add(word, Datatype);
    }
    for word in [
        "count", "sum", "avg", "min", "max", "coalesce", "isnull", "getdate", "substring",
        "upper", "lower", "ltrim", "rtrim", "len", "convert", "cast", "abs", "round",
    ] {
        keywords.add(word, Function);
    }
    main.set_keywords(keywords);

    Mode::new("sql", vec![main])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::TokenType;

    #[test]
    fn test_keywords_match_any_case() {
        let mode = sql();
        let main = mode.main();
        let map = main.keywords().unwrap();
        assert_eq!(map.lookup(b"SELECT", 0, 6), TokenType::Keyword1);
        assert_eq!(map.lookup(b"Select", 0, 6), TokenType::Keyword1);
        assert_eq!(map.lookup(b"VARCHAR", 0, 7), TokenType::Datatype);
    }
}
