mod util;

use indoc::indoc;
use util::assert_run;

#[test]
fn print_statement() {
    assert_run("print \"hello, world\";", "hello, world\n");
    assert_run("print 1 + 2;", "3\n");
}

#[test]
fn variable_declaration_and_use() {
    let input = indoc! {r#"
        var a = 1;
        var b = 2;
        print a + b;
    "#};
    assert_run(input, "3\n");
}

#[test]
fn uninitialized_variable_is_nil() {
    let input = indoc! {r#"
        var a;
        print a;
    "#};
    assert_run(input, "nil\n");
}

#[test]
fn global_redeclaration_is_permitted() {
    let input = indoc! {r#"
        var a = "first";
        var a = "second";
        print a;
    "#};
    assert_run(input, "second\n");
}

#[test]
fn assignment_is_an_expression() {
    let input = indoc! {r#"
        var a = 1;
        print a = 2;
        print a;
    "#};
    assert_run(input, "2\n2\n");
}

#[test]
fn block_scoping_and_shadowing() {
    let input = indoc! {r#"
        var a = "global";
        {
          var a = "local";
          print a;
        }
        print a;
    "#};
    assert_run(input, "local\nglobal\n");
}

#[test]
fn assignment_in_block_writes_through_to_outer_scope() {
    let input = indoc! {r#"
        var a = "before";
        {
          a = "after";
        }
        print a;
    "#};
    assert_run(input, "after\n");
}

#[test]
fn nested_block_scopes() {
    let input = indoc! {r#"
        var a = "outer";
        {
          var a = "middle";
          {
            var a = "inner";
            print a;
          }
          print a;
        }
        print a;
    "#};
    assert_run(input, "inner\nmiddle\nouter\n");
}

#[test]
fn if_else() {
    let input = indoc! {r#"
        if (1 < 2) print "then"; else print "else";
        if (nil) print "then"; else print "else";
    "#};
    assert_run(input, "then\nelse\n");
}

#[test]
fn logical_operators_return_operands() {
    let input = indoc! {r#"
        print "hi" or 2;
        print nil or "yes";
        print nil and 2;
        print 1 and 2;
    "#};
    assert_run(input, "hi\nyes\nnil\n2\n");
}

#[test]
fn logical_operators_short_circuit() {
    // The right operand of a short-circuited `or` never evaluates, so the
    // assignment inside it never runs.
    let input = indoc! {r#"
        var touched = "no";
        true or (touched = "yes");
        print touched;
    "#};
    assert_run(input, "no\n");
}

#[test]
fn while_loop() {
    let input = indoc! {r#"
        var i = 3;
        while (i > 0) {
          print i;
          i = i - 1;
        }
    "#};
    assert_run(input, "3\n2\n1\n");
}

#[test]
fn for_loop_desugars_with_increment_after_body() {
    let input = "for (var i = 0; i < 3; i = i + 1) print i;";
    assert_run(input, "0\n1\n2\n");
}

#[test]
fn for_loop_with_empty_clauses() {
    let input = indoc! {r#"
        var i = 0;
        for (; i < 2;) {
          print i;
          i = i + 1;
        }
    "#};
    assert_run(input, "0\n1\n");
}
