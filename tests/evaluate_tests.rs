mod util;

use util::{assert_command, assert_evaluate, NO_OUTPUT, RUNTIME_ERROR};

#[test]
fn literals() {
    assert_evaluate("true", "true");
    assert_evaluate("nil", "nil");
    assert_evaluate("\"hello\"", "hello");
    // Integer-valued numbers print without a decimal point at runtime.
    assert_evaluate("42", "42");
    assert_evaluate("0.5", "0.5");
}

#[test]
fn arithmetic() {
    assert_evaluate("1 + 2", "3");
    assert_evaluate("5 - 3", "2");
    assert_evaluate("4 * 2.5", "10");
    assert_evaluate("7 / 2", "3.5");
    assert_evaluate("(1 + 2) * 3", "9");
    assert_evaluate("-4", "-4");
}

#[test]
fn division_by_zero_is_not_trapped() {
    assert_evaluate("1 / 0", "inf");
    assert_evaluate("-1 / 0", "-inf");
}

#[test]
fn string_concatenation() {
    assert_evaluate("\"foo\" + \"bar\"", "foobar");
    assert_evaluate("\"\" + \"x\"", "x");
}

#[test]
fn comparisons() {
    assert_evaluate("1 < 2", "true");
    assert_evaluate("2 <= 2", "true");
    assert_evaluate("3 > 4", "false");
    assert_evaluate("4 >= 5", "false");
}

#[test]
fn equality() {
    assert_evaluate("1 == 1", "true");
    assert_evaluate("1 == 2", "false");
    assert_evaluate("\"a\" == \"a\"", "true");
    assert_evaluate("nil == nil", "true");
    // Values of different kinds are never equal; no implicit conversion.
    assert_evaluate("1 == \"1\"", "false");
    assert_evaluate("nil == false", "false");
    assert_evaluate("1 != 2", "true");
}

#[test]
fn truthiness() {
    // Only false and nil are falsey. Zero and the empty string are truthy.
    assert_evaluate("!nil", "true");
    assert_evaluate("!false", "true");
    assert_evaluate("!true", "false");
    assert_evaluate("!0", "false");
    assert_evaluate("!\"\"", "false");
    assert_evaluate("!!nil", "false");
}

#[test]
fn unary_minus_requires_a_number() {
    assert_command(
        "evaluate",
        "-\"muffin\"",
        NO_OUTPUT,
        "Operand must be a number.\n[line 1]\n",
        RUNTIME_ERROR,
    );
}

#[test]
fn mixed_addition_is_an_error() {
    assert_command(
        "evaluate",
        "1 + \"a\"",
        NO_OUTPUT,
        "Operands must be two numbers or two strings.\n[line 1]\n",
        RUNTIME_ERROR,
    );
}

#[test]
fn comparing_strings_is_an_error() {
    assert_command(
        "evaluate",
        "\"a\" < \"b\"",
        NO_OUTPUT,
        "Operands must be numbers.\n[line 1]\n",
        RUNTIME_ERROR,
    );
}
