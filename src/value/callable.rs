use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::object::Object;

/// Anything that can sit to the left of a call expression's parentheses:
/// native functions, user functions and methods, and classes (which
/// construct instances when called).
pub trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, Error>;
}
