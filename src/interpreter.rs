use crate::environment::{Environment, SharedEnvironment};
use crate::error;
use crate::error::Error;
use crate::expr::Expr;
use crate::stmt::{FunctionDeclaration, Stmt};
use crate::token::Token;
use crate::token::TokenType::*;
use crate::value::class::Class;
use crate::value::function::{globals, Function};
use crate::value::instance::Instance;
use crate::value::object::Object;
use log::trace;
use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

/// The tree walker. It executes statements and evaluates expressions by
/// recursive dispatch on the node kind, a post-order traversal where each
/// node works out its children before itself.
///
/// The interpreter owns the single mutable "current environment" pointer.
/// Every construct that needs a fresh scope goes through `execute_block`,
/// which installs the new frame and restores the old one on every exit
/// path, including return unwinds and runtime errors.
pub struct Interpreter {
    /// A fixed handle on the outermost frame. `environment` moves as
    /// scopes open and close; this never does.
    globals: SharedEnvironment,

    environment: SharedEnvironment,

    /// The resolver's side table: expression id to lexical depth.
    /// References annotated here use exact-depth access; everything else
    /// falls back to the global frame.
    locals: HashMap<usize, usize>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Self::with_locals(HashMap::new())
    }

    pub fn with_locals(locals: HashMap<usize, usize>) -> Interpreter {
        let globals = globals();
        Self {
            environment: Rc::clone(&globals),
            globals,
            locals,
        }
    }

    /// Runs a program. The first runtime error is reported and stops
    /// execution.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        trace!("executing {} statements", statements.len());
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                error::runtime_error(error);
                break;
            }
        }
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), Error> {
        match statement {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(())
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                println!("{value}");
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expression) => self.evaluate(expression)?,
                    None => Object::Nil,
                };
                self.environment
                    .borrow_mut()
                    .define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let frame = Environment::new_enclosing(&self.environment);
                self.execute_block(statements, frame)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function { declaration } => {
                // The compile-time representation becomes its runtime
                // counterpart here. The function closes over the
                // environment active at this moment, which is what makes
                // closures work.
                let function = Function::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment
                    .borrow_mut()
                    .define(declaration.name.lexeme.clone(), Object::Function(function));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expression) => self.evaluate(expression)?,
                    None => Object::Nil,
                };

                // A return can fire arbitrarily deep inside a function
                // body. The Return signal unwinds every enclosing
                // statement until the user-function call that started the
                // body catches it.
                Err(Error::Return(value))
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    /// Class declaration happens in two stages around the method
    /// construction: the name is reserved first (defined as nil), then the
    /// finished class object is assigned over the reservation, so methods
    /// built in between may already refer to the class by name.
    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDeclaration>],
    ) -> Result<(), Error> {
        let superclass_object = match superclass {
            Some(expression) => {
                let value = self.evaluate(expression)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let token = match expression {
                            Expr::Variable { name, .. } => name.clone(),
                            _ => name.clone(),
                        };
                        return Err(Error::RuntimeError(
                            token,
                            "Superclass must be a class.".to_string(),
                        ));
                    }
                }
            }
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(name.lexeme.clone(), Object::Nil);

        // With a superclass, the methods close over one extra frame that
        // binds `super`. `this` is deliberately absent from the closure;
        // it arrives per call through the bound-instance slot.
        let method_closure = match &superclass_object {
            Some(class) => {
                let frame = Environment::new_enclosing(&self.environment);
                frame
                    .borrow_mut()
                    .define("super".to_string(), Object::Class(Rc::clone(class)));
                frame
            }
            None => Rc::clone(&self.environment),
        };

        let mut method_map = HashMap::new();
        for declaration in methods {
            let is_initializer = declaration.name.lexeme == "init";
            let method = Function::new(
                Rc::clone(declaration),
                Rc::clone(&method_closure),
                is_initializer,
            );
            method_map.insert(declaration.name.lexeme.clone(), method);
        }

        let class = Class::new(name.lexeme.clone(), superclass_object, method_map);
        self.environment
            .borrow_mut()
            .assign(name, Object::Class(Rc::new(class)))?;
        Ok(())
    }

    /// Executes a statement list in the given frame, then puts the previous
    /// frame back no matter how execution left: normal completion, a
    /// return unwind, or a runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: SharedEnvironment,
    ) -> Result<(), Error> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));
        self.environment = previous;
        result
    }

    /// Evaluates an expression tree to a value.
    pub fn evaluate(&mut self, expression: &Expr) -> Result<Object, Error> {
        match expression {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match (&operator.token_type, value) {
                    (MINUS, Object::Number(n)) => Ok(Object::Number(-n)),
                    (BANG, value) => Ok(Object::Boolean(!value.is_truthy())),
                    _ => Err(Error::RuntimeError(
                        operator.clone(),
                        "Operand must be a number.".to_string(),
                    )),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                // Both operands evaluate, left to right, before the
                // operator looks at either.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(operator, left, right)
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                // Short-circuit: if the left operand decides the outcome,
                // it is returned as-is, with its own truthiness, rather
                // than coerced to a boolean. `"hi" or 2` is "hi".
                if operator.token_type == OR {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(distance) => {
                        self.environment
                            .borrow_mut()
                            .assign_at(*distance, &name.lexeme, value.clone())
                            .ok_or_else(|| resolved_miss(name))?;
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                // Assignment is an expression, so it produces the assigned
                // value for any surrounding expression.
                Ok(value)
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut evaluated_arguments = Vec::new();
                for argument in arguments {
                    evaluated_arguments.push(self.evaluate(argument)?);
                }

                callee.call(self, evaluated_arguments, paren)
            }
            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;
                match object {
                    Object::Instance(instance) => Instance::get(&instance, name),
                    _ => Err(Error::RuntimeError(
                        name.clone(),
                        "Only instances have properties.".to_string(),
                    )),
                }
            }
            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object)?;
                match object {
                    Object::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().set(name, value.clone());
                        Ok(value)
                    }
                    _ => Err(Error::RuntimeError(
                        name.clone(),
                        "Only instances have fields.".to_string(),
                    )),
                }
            }
            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),
            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn binary(&mut self, operator: &Token, left: Object, right: Object) -> Result<Object, Error> {
        use Object::{Boolean, Number, String};

        match (&operator.token_type, left, right) {
            (STAR, Number(l), Number(r)) => Ok(Number(l * r)),
            // Division by zero is not trapped; IEEE-754 infinities and
            // NaN flow through like any other number.
            (SLASH, Number(l), Number(r)) => Ok(Number(l / r)),
            (MINUS, Number(l), Number(r)) => Ok(Number(l - r)),
            (PLUS, Number(l), Number(r)) => Ok(Number(l + r)),
            (PLUS, String(l), String(r)) => Ok(String(l + r.as_str())),
            (GREATER, Number(l), Number(r)) => Ok(Boolean(l > r)),
            (GREATER_EQUAL, Number(l), Number(r)) => Ok(Boolean(l >= r)),
            (LESS, Number(l), Number(r)) => Ok(Boolean(l < r)),
            (LESS_EQUAL, Number(l), Number(r)) => Ok(Boolean(l <= r)),
            (BANG_EQUAL, l, r) => Ok(Boolean(!l.is_equal(&r))),
            (EQUAL_EQUAL, l, r) => Ok(Boolean(l.is_equal(&r))),
            (PLUS, _, _) => Err(Error::RuntimeError(
                operator.clone(),
                "Operands must be two numbers or two strings.".to_string(),
            )),
            _ => Err(Error::RuntimeError(
                operator.clone(),
                "Operands must be numbers.".to_string(),
            )),
        }
    }

    /// The depth recorded for a `super` expression locates the frame
    /// binding `super`; the `this` frame always sits exactly one step
    /// inside it. Method lookup then starts at the superclass rather than
    /// at the instance's own class.
    fn evaluate_super(
        &mut self,
        id: usize,
        keyword: &Token,
        method: &Token,
    ) -> Result<Object, Error> {
        let distance = match self.locals.get(&id) {
            Some(distance) => *distance,
            None => {
                return Err(Error::RuntimeError(
                    keyword.clone(),
                    "Can't use 'super' outside of a class.".to_string(),
                ))
            }
        };

        let superclass = self
            .environment
            .borrow()
            .get_at(distance, "super")
            .ok_or_else(|| resolved_miss(keyword))?;
        let object = self
            .environment
            .borrow()
            .get_at(distance - 1, "this")
            .ok_or_else(|| resolved_miss(keyword))?;

        match (superclass, object) {
            (Object::Class(superclass), Object::Instance(instance)) => {
                match superclass.find_method(&method.lexeme) {
                    Some(found) => Ok(Object::Function(found.bind(&instance))),
                    None => Err(Error::RuntimeError(
                        method.clone(),
                        format!("Undefined property '{}'.", method.lexeme),
                    )),
                }
            }
            _ => Err(resolved_miss(keyword)),
        }
    }

    /// References the resolver annotated read their frame by exact depth;
    /// everything else is a global and reads the global frame directly.
    fn look_up_variable(&self, id: usize, name: &Token) -> Result<Object, Error> {
        match self.locals.get(&id) {
            Some(distance) => self
                .environment
                .borrow()
                .get_at(*distance, &name.lexeme)
                .ok_or_else(|| resolved_miss(name)),
            None => self.globals.borrow().get(name),
        }
    }
}

/// A binding the resolver promised was missing at runtime. This signals a
/// resolver/evaluator mismatch, not a user error, but it surfaces as a
/// runtime error so the interpreter fails loudly instead of unwinding the
/// process.
fn resolved_miss(name: &Token) -> Error {
    Error::RuntimeError(
        name.clone(),
        format!("Undefined variable '{}' at resolved depth.", name.lexeme),
    )
}
