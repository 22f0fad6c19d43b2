use crate::error;
use crate::error::Error;
use crate::expr::Expr;
use crate::stmt::{FunctionDeclaration, Stmt};
use crate::token::Token;
use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

/// What kind of function body the resolver is currently inside. Used to
/// reject `return` at the top level and `return <value>` in initializers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// Whether the resolver is inside a class body, and if so whether that
/// class has a superclass. Gates `this` and `super`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// The static resolution pass, run between the parser and the interpreter.
/// It walks the tree once, visiting every node, and computes for each local
/// variable reference how many scopes lie between the use and the
/// declaration. The interpreter later replays those counts as parent-link
/// hops, so the two must agree exactly on where scopes begin and end.
///
/// Unlike the parser, the resolver stops at the first error: a program that
/// fails resolution is never executed, so there is nothing to recover for.
pub struct Resolver {
    /// The stack of block scopes currently in effect, innermost last.
    /// The value records whether the name's initializer has finished
    /// resolving; reading a name whose entry is still `false` is the
    /// `var a = a;` error.
    ///
    /// The global scope is deliberately not on this stack. Globals are
    /// late-bound in Lox, so any name not found here is left to runtime
    /// lookup in the global frame.
    scopes: Vec<HashMap<String, bool>>,

    /// The side table being built: expression id to lexical depth.
    locals: HashMap<usize, usize>,

    current_function: FunctionType,
    current_class: ClassType,
}

impl Resolver {
    pub fn new() -> Resolver {
        Self {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves a whole program and hands back the finished side table.
    pub fn resolve(mut self, statements: &[Stmt]) -> Result<HashMap<usize, usize>, Error> {
        self.resolve_statements(statements)?;
        Ok(self.locals)
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) -> Result<(), Error> {
        for statement in statements {
            self.resolve_statement(statement)?;
        }
        Ok(())
    }

    fn resolve_statement(&mut self, statement: &Stmt) -> Result<(), Error> {
        match statement {
            Stmt::Block { statements } => {
                self.begin_scope();
                let result = self.resolve_statements(statements);
                self.end_scope();
                result
            }
            Stmt::Var { name, initializer } => {
                // Binding is split in two. Declaring marks the name as
                // existing-but-unusable while its own initializer resolves;
                // defining flips it to usable afterwards.
                self.declare(name)?;
                if let Some(expression) = initializer {
                    self.resolve_expression(expression)?;
                }
                self.define(name);
                Ok(())
            }
            Stmt::Function { declaration } => {
                // Declared and defined eagerly, so the function can refer
                // to itself recursively inside its own body.
                self.declare(&declaration.name)?;
                self.define(&declaration.name);
                self.resolve_function(declaration, FunctionType::Function)
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),
            Stmt::Expression { expression } => self.resolve_expression(expression),
            Stmt::Print { expression } => self.resolve_expression(expression),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                // Resolution has no control flow: where execution takes one
                // branch, analysis conservatively walks both.
                self.resolve_expression(condition)?;
                self.resolve_statement(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                self.resolve_expression(condition)?;
                self.resolve_statement(body)
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    return Err(resolve_error(keyword, "Can't return from top-level code."));
                }
                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        return Err(resolve_error(
                            keyword,
                            "Can't return a value from an initializer.",
                        ));
                    }
                    self.resolve_expression(value)?;
                }
                Ok(())
            }
        }
    }

    /// Class bodies set up to two implicit scopes around their methods:
    /// an outer one holding `super` when the class has a superclass, and an
    /// inner one holding `this`. From inside a method body that puts `this`
    /// at depth 1 and `super` at depth 2, mirroring the frame chain the
    /// interpreter builds for a bound call.
    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDeclaration>],
    ) -> Result<(), Error> {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(name)?;
        self.define(name);

        if let Some(expression) = superclass {
            if let Expr::Variable {
                name: superclass_name,
                ..
            } = expression
            {
                if superclass_name.lexeme == name.lexeme {
                    return Err(resolve_error(
                        superclass_name,
                        "A class can't inherit from itself.",
                    ));
                }
            }
            self.current_class = ClassType::Subclass;
            self.resolve_expression(expression)?;

            self.begin_scope();
            self.define_implicit("super");
        }

        self.begin_scope();
        self.define_implicit("this");

        for method in methods {
            let function_type = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, function_type)?;
        }

        self.end_scope();
        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
        Ok(())
    }

    fn resolve_expression(&mut self, expression: &Expr) -> Result<(), Error> {
        match expression {
            Expr::Variable { id, name } => {
                if self.scopes.last().and_then(|scope| scope.get(&name.lexeme)) == Some(&false) {
                    return Err(resolve_error(
                        name,
                        "Can't read local variable in its own initializer.",
                    ));
                }
                self.resolve_local(*id, name);
                Ok(())
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expression(value)?;
                self.resolve_local(*id, name);
                Ok(())
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expression(left)?;
                self.resolve_expression(right)
            }
            Expr::Unary { right, .. } => self.resolve_expression(right),
            Expr::Grouping { expression } => self.resolve_expression(expression),
            Expr::Literal { .. } => {
                // No names, no subexpressions, nothing to do.
                Ok(())
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expression(callee)?;
                for argument in arguments {
                    self.resolve_expression(argument)?;
                }
                Ok(())
            }
            Expr::Get { object, .. } => {
                // Property names are looked up dynamically at runtime, so
                // only the object expression resolves statically.
                self.resolve_expression(object)
            }
            Expr::Set { object, value, .. } => {
                self.resolve_expression(value)?;
                self.resolve_expression(object)
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    return Err(resolve_error(keyword, "Can't use 'this' outside of a class."));
                }
                self.resolve_local(*id, keyword);
                Ok(())
            }
            Expr::Super { id, keyword, .. } => match self.current_class {
                ClassType::None => {
                    Err(resolve_error(keyword, "Can't use 'super' outside of a class."))
                }
                ClassType::Class => Err(resolve_error(
                    keyword,
                    "Can't use 'super' in a class with no superclass.",
                )),
                ClassType::Subclass => {
                    self.resolve_local(*id, keyword);
                    Ok(())
                }
            },
        }
    }

    /// A function's parameters and body share one scope: the braces of the
    /// body do not open a second one.
    fn resolve_function(
        &mut self,
        declaration: &FunctionDeclaration,
        function_type: FunctionType,
    ) -> Result<(), Error> {
        let enclosing_function = mem::replace(&mut self.current_function, function_type);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param)?;
            self.define(param);
        }
        self.resolve_statements(&declaration.body)?;
        self.end_scope();

        self.current_function = enclosing_function;
        Ok(())
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Enters the name into the innermost scope as not-yet-usable. In a
    /// local scope, declaring a name twice is an error; at the top level
    /// (empty stack) redeclaration is allowed and nothing is tracked.
    fn declare(&mut self, name: &Token) -> Result<(), Error> {
        if self
            .scopes
            .last()
            .is_some_and(|scope| scope.contains_key(&name.lexeme))
        {
            return Err(resolve_error(
                name,
                "Already a variable with this name in this scope.",
            ));
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), false);
        }
        Ok(())
    }

    /// Marks the name as fully initialized and available for use.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Installs an implicitly bound name (`this`, `super`) into the scope
    /// just opened for it.
    fn define_implicit(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    /// Walks the scope stack from innermost out. The first scope holding
    /// the name determines the depth recorded for this occurrence; if no
    /// scope holds it, no entry is made and the reference is left to the
    /// global frame at runtime.
    fn resolve_local(&mut self, id: usize, name: &Token) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, distance);
                return;
            }
        }
    }
}

fn resolve_error(token: &Token, message: &str) -> Error {
    error::token_error(token, message);
    Error::ResolveError
}
