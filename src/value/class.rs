use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::callable::Callable;
use crate::value::function::Function;
use crate::value::instance::Instance;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The runtime representation of a class declaration.
///
/// The superclass reference points strictly downward, subclass to
/// superclass, and a superclass knows nothing of its subclasses. Together
/// with method closures never holding `this`, that keeps the whole class
/// machinery acyclic under reference counting.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    superclass: Option<Rc<Class>>,
    methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: HashMap<String, Function>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    /// Looks the method up on this class, then up the inheritance chain.
    /// Methods found this way are still unbound; the caller decides which
    /// instance to bind them to.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        match self.methods.get(name) {
            Some(method) => Some(method.clone()),
            None => self
                .superclass
                .as_ref()
                .and_then(|superclass| superclass.find_method(name)),
        }
    }
}

impl Callable for Rc<Class> {
    /// Calling a class takes however many arguments its initializer
    /// declares; a class without an initializer takes none.
    fn arity(&self) -> usize {
        self.find_method("init")
            .map_or(0, |initializer| initializer.arity())
    }

    /// Calling a class instantiates it: make the instance, then run `init`
    /// bound to it if the class chain has one. The result is always the
    /// instance, whatever `init` does.
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, Error> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(self))));
        if let Some(initializer) = self.find_method("init") {
            initializer.bind(&instance).call(interpreter, arguments)?;
        }
        Ok(Object::Instance(instance))
    }
}
