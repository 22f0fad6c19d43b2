mod util;

use indoc::indoc;
use util::{assert_command, assert_tokenize, COMPILE_ERROR};

#[test]
fn empty_file() {
    assert_tokenize("", "EOF  null\n");
}

#[test]
fn punctuation() {
    let input = "(){};,.";
    let expected = indoc! {"
        LEFT_PAREN ( null
        RIGHT_PAREN ) null
        LEFT_BRACE { null
        RIGHT_BRACE } null
        SEMICOLON ; null
        COMMA , null
        DOT . null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn one_and_two_character_operators() {
    let input = "! != = == < <= > >= - + * /";
    let expected = indoc! {"
        BANG ! null
        BANG_EQUAL != null
        EQUAL = null
        EQUAL_EQUAL == null
        LESS < null
        LESS_EQUAL <= null
        GREATER > null
        GREATER_EQUAL >= null
        MINUS - null
        PLUS + null
        STAR * null
        SLASH / null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn string_literal() {
    let input = "\"hello\"";
    let expected = indoc! {"
        STRING \"hello\" hello
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn number_literals() {
    // Integer-valued numbers still show a decimal point in the token dump.
    let input = "1234 200.00 0.5";
    let expected = indoc! {"
        NUMBER 1234 1234.0
        NUMBER 200.00 200.0
        NUMBER 0.5 0.5
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn dot_after_number_is_its_own_token() {
    let input = "123.";
    let expected = indoc! {"
        NUMBER 123 123.0
        DOT . null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn identifiers_and_keywords() {
    let input = "var language = lox;";
    let expected = indoc! {"
        VAR var null
        IDENTIFIER language null
        EQUAL = null
        IDENTIFIER lox null
        SEMICOLON ; null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn every_keyword() {
    let input = "and class else false for fun if nil or print return super this true var while";
    let expected = indoc! {"
        AND and null
        CLASS class null
        ELSE else null
        FALSE false null
        FOR for null
        FUN fun null
        IF if null
        NIL nil null
        OR or null
        PRINT print null
        RETURN return null
        SUPER super null
        THIS this null
        TRUE true null
        VAR var null
        WHILE while null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn comments_produce_no_tokens() {
    let input = indoc! {"
        // this line is ignored
        ( // so is the rest of this one
    "};
    let expected = indoc! {"
        LEFT_PAREN ( null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn tokens_span_multiple_lines() {
    let input = "(\n)";
    let expected = indoc! {"
        LEFT_PAREN ( null
        RIGHT_PAREN ) null
        EOF  null
    "};
    assert_tokenize(input, expected);
}

#[test]
fn unexpected_character() {
    // The bad character is reported, scanning continues, and the good
    // tokens still print.
    let input = "(@)";
    let expected = indoc! {"
        LEFT_PAREN ( null
        RIGHT_PAREN ) null
        EOF  null
    "};
    let expected_error = "[line 1] Error: Unexpected character: @\n";
    assert_command("tokenize", input, expected, expected_error, COMPILE_ERROR);
}

#[test]
fn unterminated_string() {
    let input = "\"unfinished";
    let expected = "EOF  null\n";
    let expected_error = "[line 1] Error: Unterminated string.\n";
    assert_command("tokenize", input, expected, expected_error, COMPILE_ERROR);
}

#[test]
fn multiple_lex_errors_in_one_pass() {
    let input = "@#";
    let expected = "EOF  null\n";
    let expected_error = indoc! {"
        [line 1] Error: Unexpected character: @
        [line 1] Error: Unexpected character: #
    "};
    assert_command("tokenize", input, expected, expected_error, COMPILE_ERROR);
}
