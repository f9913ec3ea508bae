#[cfg(test)]
mod scanner_tests {
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let tokens: Vec<Token> = Scanner::new(source).collect();

        assert_eq!(tokens.len(), expected.len(), "tokens: {:?}", tokens);

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_fall_back() {
        assert_token_sequence(
            "! != = == < <= > >=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_comments_and_division() {
        assert_token_sequence(
            "a / b // the rest is ignored ( ) $\nc",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SLASH, "/"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::EOF, ""),
            ],
        );

        let tokens: Vec<Token> = Scanner::new("// only a comment").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::EOF);
    }

    #[test]
    fn test_scanner_04_keywords_and_identifiers() {
        assert_token_sequence(
            "and class else false for fun if nil or print return super this true var while _x1 orchid",
            &[
                (TokenType::AND, "and"),
                (TokenType::CLASS, "class"),
                (TokenType::ELSE, "else"),
                (TokenType::FALSE, "false"),
                (TokenType::FOR, "for"),
                (TokenType::FUN, "fun"),
                (TokenType::IF, "if"),
                (TokenType::NIL, "nil"),
                (TokenType::OR, "or"),
                (TokenType::PRINT, "print"),
                (TokenType::RETURN, "return"),
                (TokenType::SUPER, "super"),
                (TokenType::THIS, "this"),
                (TokenType::TRUE, "true"),
                (TokenType::VAR, "var"),
                (TokenType::WHILE, "while"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_number_literals() {
        let tokens: Vec<Token> = Scanner::new("12 3.25 7. .5").collect();

        assert_eq!(tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.25)));

        // No trailing or leading dot numbers: `7.` is NUMBER DOT, `.5` is DOT NUMBER.
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[3].token_type, TokenType::DOT);
        assert_eq!(tokens[4].token_type, TokenType::DOT);
        assert_eq!(tokens[5].literal, Some(Literal::Number(5.0)));
    }

    #[test]
    fn test_scanner_06_multiline_string_tracks_lines() {
        let tokens: Vec<Token> = Scanner::new("\"one\ntwo\"\nx").collect();

        assert_eq!(tokens[0].token_type, TokenType::STRING);
        assert_eq!(tokens[0].lexeme, "\"one\ntwo\"");
        assert_eq!(tokens[0].literal, Some(Literal::Str("one\ntwo".into())));
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_scanner_07_unterminated_string() {
        let mut scanner = Scanner::new("print \"oops\nmore");
        let tokens: Vec<Token> = scanner.by_ref().collect();

        // The broken string yields nothing; scanning still ends with EOF.
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::PRINT);
        assert_eq!(tokens[1].token_type, TokenType::EOF);

        let errors = scanner.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "[line 2] Error: Unterminated string.");
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let tokens: Vec<Token> = Scanner::new(",.$(#").collect();

        assert_eq!(tokens.len(), 6, "Expected 6 tokens, got {:?}", tokens);

        let kinds: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::COMMA,
                TokenType::DOT,
                TokenType::INVALID,
                TokenType::LEFT_PAREN,
                TokenType::INVALID,
                TokenType::EOF,
            ]
        );
        assert_eq!(tokens[2].lexeme, "$");
        assert_eq!(tokens[4].lexeme, "#");
    }

    #[test]
    fn test_multibyte_invalid_character_is_one_token() {
        let tokens: Vec<Token> = Scanner::new("a é b").collect();

        assert_eq!(tokens[1].token_type, TokenType::INVALID);
        assert_eq!(tokens[1].lexeme, "é");
        assert_eq!(tokens[2].lexeme, "b");
    }

    #[test]
    fn test_eof_once_and_fused() {
        let mut scanner = Scanner::new("");

        assert_eq!(scanner.next().map(|t| t.token_type), Some(TokenType::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_tokenize_entry_point_and_display() {
        let tokens = rox::tokenize("var x = 3;\nprint \"hi\";");

        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "VAR var null",
                "IDENTIFIER x null",
                "EQUAL = null",
                "NUMBER 3 3.0",
                "SEMICOLON ; null",
                "PRINT print null",
                "STRING \"hi\" hi",
                "SEMICOLON ; null",
                "EOF  null",
            ]
        );
        assert_eq!(tokens[5].line, 2);
    }
}
