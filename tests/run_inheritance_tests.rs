mod util;

use indoc::indoc;
use util::{assert_run, assert_runtime_error, NO_OUTPUT};

#[test]
fn methods_are_inherited() {
    let input = indoc! {r#"
        class Doughnut {
          cook() {
            print "Fry until golden brown.";
          }
        }
        class BostonCream < Doughnut {}
        BostonCream().cook();
    "#};
    assert_run(input, "Fry until golden brown.\n");
}

#[test]
fn overriding_replaces_the_inherited_method() {
    let input = indoc! {r#"
        class Doughnut {
          cook() {
            print "Fry until golden brown.";
          }
        }
        class Cruller < Doughnut {
          cook() {
            print "Twist and fry.";
          }
        }
        Cruller().cook();
        Doughnut().cook();
    "#};
    assert_run(input, "Twist and fry.\nFry until golden brown.\n");
}

#[test]
fn super_calls_the_superclass_method() {
    let input = indoc! {r#"
        class Doughnut {
          cook() {
            print "Fry until golden brown.";
          }
        }
        class BostonCream < Doughnut {
          cook() {
            super.cook();
            print "Pipe full of custard and coat with chocolate.";
          }
        }
        BostonCream().cook();
    "#};
    assert_run(
        input,
        "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n",
    );
}

#[test]
fn super_resolves_statically_not_from_the_instance() {
    // `test` lives in B, so its `super` is A, even when called on a C.
    let input = indoc! {r#"
        class A {
          method() {
            print "A method";
          }
        }
        class B < A {
          method() {
            print "B method";
          }
          test() {
            super.method();
          }
        }
        class C < B {}
        C().test();
    "#};
    assert_run(input, "A method\n");
}

#[test]
fn super_works_inside_a_nested_function() {
    let input = indoc! {r#"
        class A {
          greet() {
            return "A";
          }
        }
        class B < A {
          greet() {
            fun inner() {
              return super.greet();
            }
            return inner();
          }
        }
        print B().greet();
    "#};
    assert_run(input, "A\n");
}

#[test]
fn initializers_are_inherited() {
    let input = indoc! {r#"
        class Base {
          init(x) {
            this.x = x;
          }
        }
        class Derived < Base {}
        var derived = Derived(5);
        print derived.x;
        print derived;
    "#};
    assert_run(input, "5\nDerived instance\n");
}

#[test]
fn super_in_an_overriding_initializer() {
    let input = indoc! {r#"
        class Base {
          init(x) {
            this.x = x;
          }
        }
        class Derived < Base {
          init(x, y) {
            super.init(x);
            this.y = y;
          }
        }
        var derived = Derived(1, 2);
        print derived.x;
        print derived.y;
    "#};
    assert_run(input, "1\n2\n");
}

#[test]
fn method_lookup_walks_the_whole_chain() {
    let input = indoc! {r#"
        class A {
          a() { return "a"; }
        }
        class B < A {
          b() { return "b"; }
        }
        class C < B {
          c() { return "c"; }
        }
        var c = C();
        print c.a() + c.b() + c.c();
    "#};
    assert_run(input, "abc\n");
}

#[test]
fn superclass_must_be_a_class() {
    let input = indoc! {r#"
        var NotAClass = "so not a class";
        class Subclass < NotAClass {}
    "#};
    assert_runtime_error(
        input,
        NO_OUTPUT,
        "Superclass must be a class.\n[line 2]\n",
    );
}
