// tests/lexer_tests.rs

use constraint_lang::lexer::{Lexer, tokenize};
use constraint_lang::{Token, TokenKind};
use pretty_assertions::assert_eq;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
}

// ============================================================================
// Token kinds
// ============================================================================

#[test]
fn test_comparison_expression() {
    let tokens = tokenize("trust_score >= 0.7").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Ident, "trust_score", 0),
            Token::new(TokenKind::Operator, ">=", 12),
            Token::new(TokenKind::Number, "0.7", 15),
        ]
    );
}

#[test]
fn test_all_operators() {
    let tokens = tokenize("== != < > <= >= && || ! =>").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "=>"]);
    assert_eq!(tokens[9].kind, TokenKind::Arrow);
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("f([a, b.c])"),
        vec![
            TokenKind::Ident,
            TokenKind::Paren,
            TokenKind::Bracket,
            TokenKind::Ident,
            TokenKind::Comma,
            TokenKind::Ident,
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::Bracket,
            TokenKind::Paren,
        ]
    );
}

#[test]
fn test_every_lambda() {
    assert_eq!(
        kinds("links.every(l => l.ok)"),
        vec![
            TokenKind::Ident,
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::Paren,
            TokenKind::Ident,
            TokenKind::Arrow,
            TokenKind::Ident,
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::Paren,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    let tokens = tokenize("42 0.5 1000000000000000000000").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["42", "0.5", "1000000000000000000000"]);
}

#[test]
fn test_number_followed_by_dot_without_digits() {
    assert_eq!(kinds("1.x"), vec![TokenKind::Number, TokenKind::Dot, TokenKind::Ident]);
}

#[test]
fn test_string_escapes() {
    let tokens = tokenize(r"'it\'s' 'a\\b' 'c\nd'").unwrap();
    assert_eq!(tokens[0].text, "it's");
    assert_eq!(tokens[1].text, r"a\b");
    assert_eq!(tokens[2].text, r"c\nd");
}

#[test]
fn test_empty_string() {
    let tokens = tokenize("''").unwrap();
    assert_eq!(tokens, vec![Token::new(TokenKind::String, "", 0)]);
}

#[test]
fn test_string_end_includes_escapes() {
    let tokens = tokenize(r"'it\'s' x").unwrap();
    assert_eq!(tokens[0].text, "it's");
    assert_eq!(tokens[0].end, 7);
    assert_eq!(tokens[1].position, 8);
    assert_eq!(tokens[1].end, 9);
}

#[test]
fn test_positions_are_character_offsets() {
    let tokens = tokenize("'é' == x").unwrap();
    assert_eq!(tokens[1].position, 4);
    assert_eq!(tokens[2].position, 7);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string_reports_opening_quote() {
    let err = tokenize("status == 'active").unwrap_err();
    assert_eq!(err.message, "Unterminated string literal");
    assert_eq!(err.position, 10);
}

#[test]
fn test_unexpected_characters() {
    for (input, position) in [("a = b", 2), ("a & b", 2), ("a | b", 2), ("a + 1", 2), ("$x", 0)] {
        let err = tokenize(input).unwrap_err();
        assert!(err.message.starts_with("Unexpected character"), "{}", input);
        assert_eq!(err.position, position, "{}", input);
    }
}

#[test]
fn test_error_display_includes_position() {
    let err = tokenize("x # y").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected character: # at position 2");
}

#[test]
fn test_lexer_streams_tokens() {
    let mut lexer = Lexer::new("a b");
    assert_eq!(lexer.next_token().unwrap().map(|t| t.text), Some("a".to_string()));
    assert_eq!(lexer.next_token().unwrap().map(|t| t.text), Some("b".to_string()));
    assert_eq!(lexer.next_token().unwrap(), None);
}
