use crate::environment::{Environment, SharedEnvironment};
use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::stmt::FunctionDeclaration;
use crate::value::callable::Callable;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The runtime representation of a function.
#[derive(Clone)]
pub enum Function {
    /// The one native: wall-clock seconds since the epoch.
    Clock,
    UserDefined {
        /// Shared with the declaring statement node; also what method
        /// rebinding shares, so every binding of a method points at the
        /// same declaration.
        declaration: Rc<FunctionDeclaration>,

        /// The environment in effect where the function was declared, not
        /// where it is called. For methods this is the class's `super`
        /// frame when one exists. It never contains `this`.
        closure: SharedEnvironment,

        /// Whether this is a class's `init`. A user function with the name
        /// `init` outside a class body is not an initializer, so the flag
        /// cannot be recomputed from the declaration.
        is_initializer: bool,

        /// The instance a method invocation will see as `this`. `None` for
        /// plain functions and for methods still attached to their class;
        /// property access fills it in. Binding replaces this slot and
        /// touches nothing else, so rebinding never stacks.
        instance: Option<Rc<RefCell<Instance>>>,
    },
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionDeclaration>,
        closure: SharedEnvironment,
        is_initializer: bool,
    ) -> Self {
        Function::UserDefined {
            declaration,
            closure,
            is_initializer,
            instance: None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Function::Clock => "clock".to_string(),
            Function::UserDefined { declaration, .. } => declaration.name.lexeme.clone(),
        }
    }

    /// Produces the bound form of a method: same declaration, same closure,
    /// same initializer flag, with `instance` recorded for call time.
    pub fn bind(&self, instance: &Rc<RefCell<Instance>>) -> Function {
        match self {
            Function::UserDefined {
                declaration,
                closure,
                is_initializer,
                ..
            } => Function::UserDefined {
                declaration: Rc::clone(declaration),
                closure: Rc::clone(closure),
                is_initializer: *is_initializer,
                instance: Some(Rc::clone(instance)),
            },
            Function::Clock => self.clone(),
        }
    }

    /// Identity comparison: two function values are the same function when
    /// they share a declaration, a closure frame, and a bound instance.
    /// Distinct bindings of one method are therefore distinct values.
    pub fn is_same(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Clock, Function::Clock) => true,
            (
                Function::UserDefined {
                    declaration: left_declaration,
                    closure: left_closure,
                    instance: left_instance,
                    ..
                },
                Function::UserDefined {
                    declaration: right_declaration,
                    closure: right_closure,
                    instance: right_instance,
                    ..
                },
            ) => {
                Rc::ptr_eq(left_declaration, right_declaration)
                    && Rc::ptr_eq(left_closure, right_closure)
                    && match (left_instance, right_instance) {
                        (None, None) => true,
                        (Some(left), Some(right)) => Rc::ptr_eq(left, right),
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    fn bound_this(&self) -> Object {
        match self {
            Function::UserDefined {
                instance: Some(instance),
                ..
            } => Object::Instance(Rc::clone(instance)),
            _ => Object::Nil,
        }
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        match self {
            Function::Clock => 0,
            Function::UserDefined { declaration, .. } => declaration.params.len(),
        }
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, Error> {
        match self {
            Function::Clock => {
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs_f64();
                Ok(Object::Number(seconds))
            }
            Function::UserDefined {
                declaration,
                closure,
                is_initializer,
                instance,
            } => {
                // A bound call interposes a frame holding `this` between
                // the closure and the parameters, reproducing at runtime
                // the scope nesting the resolver saw: parameters, then
                // `this`, then (possibly) `super`. An unbound call gets
                // only the parameter frame.
                let parent = match instance {
                    Some(instance) => {
                        let this_frame = Environment::new_enclosing(closure);
                        this_frame
                            .borrow_mut()
                            .define("this".to_string(), Object::Instance(Rc::clone(instance)));
                        this_frame
                    }
                    None => Rc::clone(closure),
                };

                let frame = Environment::new_enclosing(&parent);
                for (param, argument) in declaration.params.iter().zip(arguments) {
                    frame.borrow_mut().define(param.lexeme.clone(), argument);
                }

                match interpreter.execute_block(&declaration.body, frame) {
                    // The one legitimate catch point for the return signal.
                    Err(Error::Return(value)) => match is_initializer {
                        // An initializer's return is always the instance,
                        // even for a bare `return;`.
                        true => Ok(self.bound_this()),
                        false => Ok(value),
                    },
                    Err(error) => Err(error),
                    Ok(()) => match is_initializer {
                        true => Ok(self.bound_this()),
                        // A body that runs off the end produces nil.
                        false => Ok(Object::Nil),
                    },
                }
            }
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// The outermost environment, prepopulated with the native functions.
pub fn globals() -> SharedEnvironment {
    let env = Environment::new();
    env.borrow_mut()
        .define("clock".to_string(), Object::Function(Function::Clock));
    env
}
